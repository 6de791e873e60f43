//! ChemBERTa encoder backend using Candle.

use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config, XLMRobertaModel};
use hf_hub::api::sync::{ApiBuilder, ApiRepo};
use hf_hub::{Repo, RepoType};
use tokenizers::models::bpe::BPE;
use tokenizers::pre_tokenizers::byte_level::ByteLevel;
use tokenizers::processors::roberta::RobertaProcessing;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::{EmbedError, EncoderBackend, EncoderConfig, Result, TokenizedInput};

/// RoBERTa-family chemical language model loaded from the Hugging Face Hub.
///
/// `DeepChem/ChemBERTa-77M-MTR` by default: 384-dim hidden states over a
/// SMILES byte-pair vocabulary. Position ids start after the padding index,
/// as in RoBERTa.
pub struct ChembertaBackend {
    model: XLMRobertaModel,
    tokenizer: Tokenizer,
    device: Device,
    max_length: usize,
    hidden_size: usize,
    model_id: String,
}

impl ChembertaBackend {
    /// Download (or reuse the hub cache) and load the model.
    pub async fn load(config: &EncoderConfig) -> Result<Self> {
        let start = Instant::now();
        info!("Loading ChemBERTa model: {}", config.model_id);

        let device = Self::select_device(config);
        debug!("Using device: {:?}", device);

        let model_id = config.model_id.clone();
        let cache_dir = config.cache_dir.clone();
        let (model_config, mut tokenizer, weights_path) = tokio::task::spawn_blocking(move || {
            let mut builder = ApiBuilder::new();
            if let Some(dir) = cache_dir {
                builder = builder.with_cache_dir(PathBuf::from(dir));
            }
            let api = builder.build()?;
            let repo = api.repo(Repo::new(model_id, RepoType::Model));

            info!("Downloading config.json...");
            let config_path = repo
                .get("config.json")
                .map_err(|e| EmbedError::Download(format!("config.json: {}", e)))?;
            let model_config = ModelConfig::from_file(&config_path)?;

            info!("Downloading tokenizer...");
            let tokenizer = Self::load_tokenizer(&repo)?;

            info!("Downloading model weights...");
            let weights_path = repo
                .get("model.safetensors")
                .or_else(|_| repo.get("pytorch_model.bin"))
                .map_err(|e| EmbedError::Download(format!("model weights: {}", e)))?;
            debug!("Weights at: {:?}", weights_path);

            Ok::<_, EmbedError>((model_config, tokenizer, weights_path))
        })
        .await
        .map_err(|e| EmbedError::Download(e.to_string()))??;

        let vb = if weights_path.extension().is_some_and(|e| e == "safetensors") {
            unsafe { VarBuilder::from_mmaped_safetensors(&[&weights_path], DType::F32, &device)? }
        } else {
            VarBuilder::from_pth(&weights_path, DType::F32, &device)?
        };

        // RobertaForRegression and friends keep the encoder under `roberta.`
        let vb = if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            vb.pp("roberta")
        } else {
            vb
        };
        let model = XLMRobertaModel::new(&model_config.inner, vb)
            .map_err(|e| EmbedError::ModelLoad(e.to_string()))?;

        let max_length = config.max_length.min(model_config.max_sequence_length());
        configure_truncation(&mut tokenizer, max_length)?;
        info!("Model loaded in {:.2}s", start.elapsed().as_secs_f32());

        Ok(Self {
            model,
            tokenizer,
            device,
            max_length,
            hidden_size: model_config.hidden_size,
            model_id: config.model_id.clone(),
        })
    }

    /// Select the best available device.
    fn select_device(config: &EncoderConfig) -> Device {
        if !config.use_gpu {
            return Device::Cpu;
        }

        #[cfg(feature = "cuda")]
        {
            match Device::new_cuda(0) {
                Ok(device) => {
                    info!("CUDA device available");
                    return device;
                }
                Err(e) => {
                    debug!("CUDA not available: {}, falling back to CPU", e);
                }
            }
        }

        #[cfg(feature = "metal")]
        {
            match Device::new_metal(0) {
                Ok(device) => {
                    info!("Metal device available");
                    return device;
                }
                Err(e) => {
                    debug!("Metal not available: {}, falling back to CPU", e);
                }
            }
        }

        Device::Cpu
    }

    /// `tokenizer.json` when the repo ships one, else a BPE model from
    /// `vocab.json` + `merges.txt`.
    fn load_tokenizer(repo: &ApiRepo) -> Result<Tokenizer> {
        if let Ok(path) = repo.get("tokenizer.json") {
            debug!("Found tokenizer.json");
            return Ok(Tokenizer::from_file(&path)?);
        }

        info!("tokenizer.json not found, building BPE from vocab.json + merges.txt");
        let vocab = repo
            .get("vocab.json")
            .map_err(|e| EmbedError::Download(format!("vocab.json: {}", e)))?;
        let merges = repo
            .get("merges.txt")
            .map_err(|e| EmbedError::Download(format!("merges.txt: {}", e)))?;

        let bpe = BPE::from_file(&vocab.to_string_lossy(), &merges.to_string_lossy())
            .build()
            .map_err(|e| EmbedError::Tokenizer(format!("BPE build: {}", e)))?;
        roberta_tokenizer(bpe)
    }

    /// Hidden state width, which is the embedding dimension.
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn is_gpu(&self) -> bool {
        matches!(self.device, Device::Cuda(_) | Device::Metal(_))
    }
}

impl EncoderBackend for ChembertaBackend {
    fn tokenize(&self, text: &str) -> Result<TokenizedInput> {
        let encoding = self.tokenizer.encode(text, true)?;
        Ok(TokenizedInput::new(
            encoding.get_ids().to_vec(),
            encoding.get_attention_mask().to_vec(),
        ))
    }

    fn forward(&self, input: &TokenizedInput) -> Result<Tensor> {
        if input.is_empty() {
            return Err(EmbedError::InvalidInput("no tokens to encode".to_string()));
        }

        let input_ids = Tensor::new(input.ids.as_slice(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let attention_mask = Tensor::new(input.attention_mask.as_slice(), &self.device)?
            .unsqueeze(0)?
            .to_dtype(DType::F32)?;

        Ok(self
            .model
            .forward(&input_ids, &attention_mask, &token_type_ids, None, None, None)?)
    }

    fn max_length(&self) -> usize {
        self.max_length
    }
}

/// `config.json` as Candle's RoBERTa config plus the fields needed for sizing.
struct ModelConfig {
    inner: Config,
    hidden_size: usize,
    max_position_embeddings: usize,
    pad_token_id: usize,
}

impl ModelConfig {
    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(serde_json::from_str(&content)?)
    }

    fn from_json(json: serde_json::Value) -> Result<Self> {
        let int = |key: &str, default: usize| {
            json.get(key).and_then(|v| v.as_u64()).map_or(default, |v| v as usize)
        };
        let hidden_size = int("hidden_size", 384);
        let max_position_embeddings = int("max_position_embeddings", 515);
        let pad_token_id = int("pad_token_id", 1);

        let inner = serde_json::from_value(json)
            .map_err(|e| EmbedError::ModelLoad(format!("config.json: {}", e)))?;
        Ok(Self { inner, hidden_size, max_position_embeddings, pad_token_id })
    }

    /// Position ids run from `pad_token_id + 1`, so the usable length is
    /// shorter than the position table.
    fn max_sequence_length(&self) -> usize {
        self.max_position_embeddings.saturating_sub(self.pad_token_id + 1)
    }
}

/// Wrap a byte-level BPE vocabulary the way RoBERTa tokenizers are assembled:
/// byte-level pre-tokenization and `<s> ... </s>` around every sequence.
fn roberta_tokenizer(bpe: BPE) -> Result<Tokenizer> {
    let mut tokenizer = Tokenizer::new(bpe);
    let special = |token: &str| {
        tokenizer
            .token_to_id(token)
            .map(|id| (token.to_string(), id))
            .ok_or_else(|| EmbedError::Tokenizer(format!("vocabulary has no {} token", token)))
    };
    let sep = special("</s>")?;
    let cls = special("<s>")?;

    tokenizer
        .with_pre_tokenizer(Some(ByteLevel::default().add_prefix_space(false)))
        .with_post_processor(Some(RobertaProcessing::new(sep, cls)));
    Ok(tokenizer)
}

/// Truncate inside the tokenizer so special tokens survive; never pad.
fn configure_truncation(tokenizer: &mut Tokenizer, max_length: usize) -> Result<()> {
    tokenizer
        .with_truncation(Some(TruncationParams { max_length, ..Default::default() }))?
        .with_padding(None);
    Ok(())
}
