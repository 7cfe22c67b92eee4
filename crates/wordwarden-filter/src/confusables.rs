//! Confusable character table
//!
//! Maps every visual stand-in for a letter or digit (diacritics, Greek and
//! Cyrillic look-alikes, leetspeak, full-width, circled, squared and
//! mathematical alphanumeric forms) back to its canonical lowercase base.
//!
//! The table is built once from a fixed, ordered variant list and is
//! read-only afterwards. Two views are exposed:
//!
//! - a forward map (variant -> single canonical base), used to fold raw tokens
//! - a reverse index (variant -> ordered bases it may stand for), used for
//!   bounded expansion in the term classifier
//!
//! When a variant appears under several bases the first registration wins in
//! the forward map; bases are registered `a..z`, then `A..Z`, then `0..9`.

use aho_corasick::{AhoCorasick, MatchKind};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// Hand-curated variants per canonical base, in registration order.
const EXPLICIT_VARIANTS: &[(char, &[&str])] = &[
    ('a', &["a", "@", "4", "α", "λ", "*", "à", "á", "â", "ã", "ä", "å", "ᴀ", "ɒ", "Å", "ᵃ", "ᵄ", "ɑ", "ɐ", "д", "ā", "ă", "ą"]),
    ('b', &["b", "8", "6", "β", "*", "ḃ", "ḅ", "ḇ", "ʙ", "ɓ", "ß", "ᵇ", "ь", "в", "þ"]),
    ('c', &["c", "(", "<", "ç", "*", "ć", "ĉ", "ċ", "ᴄ", "ɔ", "¢", "ᶜ", "č", "©"]),
    ('d', &["d", "|)", "đ", "ᴅ", "ɖ", "ð", "ᵈ", "ď", "ԁ"]),
    ('e', &["e", "3", "€", "ε", "*", "è", "é", "ê", "ë", "ē", "ĕ", "ė", "ę", "ě", "ᴇ", "ɘ", "£", "ℯ", "ₑ", "ᵉ", "є", "ё"]),
    ('f', &["f", "ƒ", "ꜰ", "ʄ", "ʃ", "ᶠ", "ғ"]),
    ('g', &["g", "9", "ğ", "ġ", "ģ", "ɢ", "ɡ", "ℊ", "ĝ", "ᵍ"]),
    ('h', &["h", "#", "ĥ", "ħ", "ʜ", "ɦ", "ₕ", "ʰ", "н", "һ"]),
    ('i', &["i", "1", "!", "|", "ι", "*", "ì", "í", "î", "ï", "ĩ", "ī", "ĭ", "į", "ı", "ɪ", "ɨ", "¡", "ᵢ", "ⁱ", "і"]),
    ('j', &["j", "ĵ", "ᴊ", "ل", "ʲ", "ʝ", "ј"]),
    ('k', &["k", "ķ", "ᴋ", "κ", "ₖ", "ᵏ", "к", "ʞ"]),
    ('l', &["l", "|", "*", "ĺ", "ļ", "ľ", "ŀ", "ł", "ʟ", "ɭ", "£", "ₗ", "ˡ", "1", "I", "i", "ӏ"]),
    ('m', &["m", "ɱ", "ᴍ", "м", "ᵐ", "ₘ"]),
    ('n', &["n", "ñ", "ń", "ņ", "ň", "ŉ", "ɴ", "ɲ", "ₙ", "ⁿ", "и", "η"]),
    ('o', &["o", "0", "()", "ο", "*", "ò", "ó", "ô", "õ", "ö", "ø", "ő", "ɵ", "θ", "ℴ", "ₒ", "ᵒ", "ō", "ŏ", "ᴏ", "о", "σ"]),
    ('p', &["p", "ᴘ", "ƥ", "ᵖ", "ρ", "р", "ₚ"]),
    ('q', &["q", "ϙ", "ʠ", "ԛ"]),
    ('r', &["r", "ŕ", "ŗ", "ř", "ʀ", "ɹ", "ᵣ", "ʳ", "я", "г"]),
    ('s', &["s", "5", "$", "*", "#", "ś", "ş", "š", "ſ", "ꜱ", "ʂ", "§", "ₛ", "ˢ", "ŝ", "ѕ"]),
    ('t', &["t", "7", "+", "τ", "*", "ţ", "ť", "ŧ", "ᴛ", "ʈ", "†", "ₜ", "ᵗ", "т"]),
    ('u', &["u", "@", "v", "υ", "*", "ù", "ú", "û", "ü", "ũ", "ū", "ŭ", "ů", "ű", "ų", "ᴜ", "ʊ", "µ", "ᵤ", "ᵘ", "ц"]),
    ('v', &["v", "u", "*", "ᴠ", "ʋ", "ѵ", "ᵛ", "ν"]),
    ('w', &["w", "ᴡ", "ω", "ʷ", "vv", "uu", "ʍ", "ш", "щ"]),
    ('x', &["x", "×", "*", "᙮", "χ", "ˣ", "><", "ж", "х"]),
    ('y', &["y", "ý", "ÿ", "ŷ", "ɣ", "у", "ʸ", "ʏ", "γ"]),
    ('z', &["z", "2", "*", "ź", "ż", "ž", "ᴢ", "ᶻ", "ʐ", "з"]),
    ('A', &["A", "4", "@"]),
    ('B', &["B", "ℬ", "8", "6"]),
    ('C', &["C", "ℭ", "ℂ", "(", "<"]),
    ('D', &["D"]),
    ('E', &["E", "ℰ", "3", "€"]),
    ('F', &["F", "ℱ"]),
    ('G', &["G", "9"]),
    ('H', &["H", "ℋ", "ℌ", "#"]),
    ('I', &["I", "ℑ", "1", "!", "|", "l", "i"]),
    ('J', &["J"]),
    ('K', &["K"]),
    ('L', &["L", "ℒ", "1", "I", "i", "|"]),
    ('M', &["M", "ℳ"]),
    ('N', &["N", "ℕ"]),
    ('O', &["O", "0", "()"]),
    ('P', &["P", "ℙ"]),
    ('Q', &["Q", "ℚ"]),
    ('R', &["R", "ℛ", "ℜ"]),
    ('S', &["S", "5", "$", "#"]),
    ('T', &["T", "7", "+"]),
    ('U', &["U", "V"]),
    ('V', &["V", "U"]),
    ('W', &["W", "VV", "UU"]),
    ('X', &["X", "><"]),
    ('Y', &["Y"]),
    ('Z', &["Z", "ℨ", "ℤ"]),
    ('0', &["0", "o", "O", "()", "ο", "*", "ò", "ó", "ô", "õ", "ö", "ø", "ő", "ɵ", "θ"]),
    ('1', &["1", "I", "i", "!", "|", "ι", "*", "ì", "í", "î", "ï", "ĩ", "ī", "ĭ", "į", "ı", "ɪ", "ɨ", "¡"]),
    ('2', &["2", "z", "Z", "*", "ź", "ż", "ž", "ᴢ"]),
    ('3', &["3", "e", "E", "€", "ε", "*", "è", "é", "ê", "ë", "ē", "ĕ", "ė", "ę", "ě", "ᴇ", "ɘ", "£"]),
    ('4', &["4", "a", "A", "@", "α", "λ", "*", "à", "á", "â", "ã", "ä", "å", "ᴀ", "ɒ", "Å", "h"]),
    ('5', &["5", "s", "S", "*", "ś", "ş", "š", "ſ", "ꜱ", "ʂ", "§"]),
    ('6', &["6", "b", "B", "8", "β", "*", "ḃ", "ḅ", "ḇ", "ʙ", "ɓ", "ß"]),
    ('7', &["7", "t", "T", "+", "τ", "*", "ţ", "ť", "ŧ", "ᴛ", "ʈ", "†"]),
    ('8', &["8", "b", "B", "6", "β", "*", "ḃ", "ḅ", "ḇ", "ʙ", "ɓ", "ß"]),
    ('9', &["9", "g", "G", "ğ", "ġ", "ģ", "ɢ", "ɡ"]),
];

/// First code point (capital A) of each 52-letter mathematical alphanumeric
/// style: bold, italic, bold italic, script, bold script, fraktur,
/// double-struck, bold fraktur, sans-serif, sans-serif bold, sans-serif
/// italic, sans-serif bold italic, monospace. Reserved holes inside these
/// blocks are unassigned and never occur in text.
const MATH_LETTER_STYLES: &[u32] = &[
    0x1D400, 0x1D434, 0x1D468, 0x1D49C, 0x1D4D0, 0x1D504, 0x1D538, 0x1D56C, 0x1D5A0, 0x1D5D4,
    0x1D608, 0x1D63C, 0x1D670,
];

/// First code point (digit zero) of bold, double-struck, sans-serif,
/// sans-serif bold and monospace mathematical digits.
const MATH_DIGIT_STYLES: &[u32] = &[0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6];

const FULLWIDTH_UPPER_A: u32 = 0xFF21;
const FULLWIDTH_LOWER_A: u32 = 0xFF41;
const FULLWIDTH_ZERO: u32 = 0xFF10;
const CIRCLED_UPPER_A: u32 = 0x24B6;
const CIRCLED_LOWER_A: u32 = 0x24D0;
const PARENTHESIZED_LOWER_A: u32 = 0x249C;
const CIRCLED_ONE: u32 = 0x2460;
const CIRCLED_ZERO: u32 = 0x24EA;
const SQUARED_UPPER_A: u32 = 0x1F130;
const NEGATIVE_CIRCLED_UPPER_A: u32 = 0x1F150;
const NEGATIVE_SQUARED_UPPER_A: u32 = 0x1F170;
const EMOJI_PRESENTATION: char = '\u{FE0F}';

fn offset_char(start: u32, index: u32) -> Option<char> {
    char::from_u32(start + index)
}

/// Styled letter forms generated from block offsets for a lowercase base
fn styled_letter_variants(base: char) -> Vec<String> {
    let index = base as u32 - 'a' as u32;
    let mut variants = Vec::new();

    for start in [
        FULLWIDTH_LOWER_A,
        FULLWIDTH_UPPER_A,
        CIRCLED_LOWER_A,
        CIRCLED_UPPER_A,
        PARENTHESIZED_LOWER_A,
        SQUARED_UPPER_A,
        NEGATIVE_CIRCLED_UPPER_A,
        NEGATIVE_SQUARED_UPPER_A,
    ] {
        if let Some(c) = offset_char(start, index) {
            variants.push(c.to_string());
        }
    }

    for style in MATH_LETTER_STYLES {
        if let Some(c) = offset_char(*style, index) {
            variants.push(c.to_string());
        }
        if let Some(c) = offset_char(*style + 26, index) {
            variants.push(c.to_string());
        }
    }

    // Negative squared letters are commonly sent with an emoji selector.
    if let Some(c) = offset_char(NEGATIVE_SQUARED_UPPER_A, index) {
        variants.push(format!("{c}{EMOJI_PRESENTATION}"));
    }

    variants
}

/// Styled digit forms generated from block offsets
fn styled_digit_variants(base: char) -> Vec<String> {
    let digit = base as u32 - '0' as u32;
    let mut variants = Vec::new();

    if let Some(c) = offset_char(FULLWIDTH_ZERO, digit) {
        variants.push(c.to_string());
    }
    let circled = if digit == 0 {
        char::from_u32(CIRCLED_ZERO)
    } else {
        offset_char(CIRCLED_ONE, digit - 1)
    };
    if let Some(c) = circled {
        variants.push(c.to_string());
    }
    for style in MATH_DIGIT_STYLES {
        if let Some(c) = offset_char(*style, digit) {
            variants.push(c.to_string());
        }
    }

    variants
}

/// The single-character case forms of a variant: itself, lower and upper.
fn case_forms(variant: char) -> Vec<char> {
    let mut forms = vec![variant];
    for folded in [single_char(variant.to_lowercase()), single_char(variant.to_uppercase())] {
        if let Some(c) = folded {
            if !forms.contains(&c) {
                forms.push(c);
            }
        }
    }
    forms
}

/// Case mappings that expand to several characters (e.g. `ß` -> `SS`) are
/// not single-character substitutions and are dropped.
fn single_char(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    let first = mapped.next()?;
    mapped.next().is_none().then_some(first)
}

fn lower_base(base: char) -> char {
    base.to_ascii_lowercase()
}

/// Immutable confusable table shared by every filter instance
pub struct ConfusableTable {
    /// Single-character variant -> canonical lowercase base
    forward: HashMap<char, char>,

    /// Multi-character variants in registration order
    sequences: Vec<(String, String)>,

    /// Variant form -> ordered canonical bases
    reverse: HashMap<String, Vec<char>>,

    /// Fast path for the multi-character pass
    sequence_matcher: Option<AhoCorasick>,
}

impl ConfusableTable {
    /// Build the table from the fixed variant lists
    pub fn new() -> Self {
        let mut forward: HashMap<char, char> = HashMap::new();
        let mut sequences: Vec<(String, String)> = Vec::new();
        let mut reverse: HashMap<String, Vec<char>> = HashMap::new();

        for (base, variants) in Self::registration_order() {
            let canonical = lower_base(base);

            for variant in &variants {
                let mut chars = variant.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => {
                        for form in case_forms(c) {
                            forward.entry(form).or_insert(canonical);
                            push_unique(reverse.entry(form.to_string()).or_default(), canonical);
                        }
                    }
                    (Some(_), Some(_)) => {
                        if !sequences.iter().any(|(seq, _)| seq == variant) {
                            sequences.push((variant.clone(), canonical.to_string()));
                        }
                        push_unique(reverse.entry(variant.clone()).or_default(), canonical);
                    }
                    _ => {}
                }
            }
        }

        let sequence_matcher = match AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(sequences.iter().map(|(seq, _)| seq.as_str()))
        {
            Ok(matcher) => Some(matcher),
            Err(e) => {
                warn!("Confusable sequence matcher unavailable, using sequential replacement: {}", e);
                None
            }
        };

        debug!(
            single = forward.len(),
            sequences = sequences.len(),
            "Confusable table built"
        );

        Self {
            forward,
            sequences,
            reverse,
            sequence_matcher,
        }
    }

    /// Process-wide shared instance, built on first use
    pub fn shared() -> Arc<ConfusableTable> {
        static SHARED: OnceLock<Arc<ConfusableTable>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(ConfusableTable::new())).clone()
    }

    /// Every base with its full variant list (explicit plus generated)
    fn registration_order() -> Vec<(char, Vec<String>)> {
        EXPLICIT_VARIANTS
            .iter()
            .map(|(base, explicit)| {
                let mut variants: Vec<String> = explicit.iter().map(|v| v.to_string()).collect();
                if base.is_ascii_lowercase() {
                    variants.extend(styled_letter_variants(*base));
                } else if base.is_ascii_digit() {
                    variants.extend(styled_digit_variants(*base));
                }
                (*base, variants)
            })
            .collect()
    }

    /// Canonical base for a single character, if it is a known variant
    pub fn base_of(&self, c: char) -> Option<char> {
        self.forward.get(&c).copied()
    }

    /// Ordered bases a single character may stand for (empty if unknown)
    pub fn bases_for(&self, c: char) -> &[char] {
        let mut buf = [0u8; 4];
        let key: &str = c.encode_utf8(&mut buf);
        self.reverse
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Ordered bases for a (possibly multi-character) variant
    pub fn bases_for_variant(&self, variant: &str) -> &[char] {
        self.reverse.get(variant).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of single-character substitutions
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Fold text to canonical bases: multi-character sequences first, then
    /// single characters, then lowercase.
    pub fn to_base(&self, text: &str) -> String {
        let replaced = match &self.sequence_matcher {
            Some(matcher) => {
                let bases: Vec<&str> = self.sequences.iter().map(|(_, b)| b.as_str()).collect();
                matcher.replace_all(text, &bases)
            }
            None => self.replace_sequences(text),
        };
        self.fold_single(&replaced)
    }

    /// Sequential substring replacement; equivalent to the matcher pass
    pub(crate) fn replace_sequences(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (seq, base) in &self.sequences {
            if out.contains(seq.as_str()) {
                out = out.replace(seq.as_str(), base);
            }
        }
        out
    }

    fn fold_single(&self, text: &str) -> String {
        text.chars()
            .map(|c| self.base_of(c).unwrap_or(c))
            .collect::<String>()
            .to_lowercase()
    }

    #[cfg(test)]
    pub(crate) fn to_base_sequential(&self, text: &str) -> String {
        self.fold_single(&self.replace_sequences(text))
    }
}

impl Default for ConfusableTable {
    fn default() -> Self {
        Self::new()
    }
}

fn push_unique(bases: &mut Vec<char>, base: char) {
    if !bases.contains(&base) {
        bases.push(base);
    }
}
