//! Compound name clean-up before querying PubChem.
//!
//! PubChem's name search does not match Greek letters, and a `/` would split
//! the URL path. Five Greek letters are spelled out; everything else passes
//! through untouched.

/// Greek letters spelled out in names, in application order.
const GREEK_SPELLINGS: [(char, &str); 5] = [
    ('α', "alpha"),
    ('β', "beta"),
    ('γ', "gamma"),
    ('δ', "delta"),
    ('ω', "omega"),
];

/// Clean a raw compound name for use as a PubChem query.
///
/// A name that starts with a Greek letter has only that leading letter spelled
/// out (`α-amanitin` → `alpha-amanitin`). Otherwise every occurrence becomes a
/// hyphen-prefixed spelling (`17α-estradiol` → `17-alpha-estradiol`). Slashes
/// become spaces last.
pub fn normalise(raw: &str) -> String {
    let mut name = raw.to_string();
    for (symbol, spelled) in GREEK_SPELLINGS {
        name = match name.strip_prefix(symbol) {
            Some(rest) => format!("{spelled}{rest}"),
            None => name.replace(symbol, &format!("-{spelled}")),
        };
    }
    name.replace('/', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_greek_letter() {
        assert_eq!(normalise("α-amanitin"), "alpha-amanitin");
        assert_eq!(normalise("β-Lapachone"), "beta-Lapachone");
        assert_eq!(normalise("ω-conotoxin"), "omega-conotoxin");
    }

    #[test]
    fn test_inner_greek_letter_gets_hyphen() {
        assert_eq!(normalise("17α-estradiol"), "17-alpha-estradiol");
        assert_eq!(normalise("PI3Kδ inhibitor"), "PI3K-delta inhibitor");
        assert_eq!(normalise("IFNγ"), "IFN-gamma");
    }

    #[test]
    fn test_leading_letter_leaves_repeats_of_same_letter() {
        // Only the leading occurrence is spelled when the name starts with it.
        assert_eq!(normalise("αα"), "alphaα");
        // A different letter later in the name is still replaced.
        assert_eq!(normalise("αβ"), "alpha-beta");
    }

    #[test]
    fn test_slashes_become_spaces() {
        assert_eq!(normalise("drug/form"), "drug form");
        assert_eq!(normalise("Lopinavir/ritonavir/x"), "Lopinavir ritonavir x");
    }

    #[test]
    fn test_other_symbols_pass_through() {
        assert_eq!(normalise("Ε-toxin µM (+)-JQ1"), "Ε-toxin µM (+)-JQ1");
        assert_eq!(normalise(""), "");
    }

    #[test]
    fn test_idempotent_on_clean_names() {
        for name in ["Sinomenine", "alpha-amanitin", "drug form", "(S)-crizotinib", "17-alpha-estradiol"] {
            let once = normalise(name);
            assert_eq!(once, name);
            assert_eq!(normalise(&once), once);
        }
    }

    #[test]
    fn test_deterministic() {
        let raw = "γ/δ-tocopherol";
        assert_eq!(normalise(raw), normalise(raw));
        assert_eq!(normalise(raw), "gamma -delta-tocopherol");
    }
}
