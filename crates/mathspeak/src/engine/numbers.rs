//! Numerals to English words.

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Irregular ordinal forms, keyed by the cardinal word they replace.
const IRREGULAR_ORDINALS: [(&str, &str); 6] = [
    ("one", "first"),
    ("two", "second"),
    ("three", "third"),
    ("five", "fifth"),
    ("eight", "eighth"),
    ("nine", "ninth"),
];

/// Powers of one thousand, largest first. `u64::MAX` is about 18 quintillion.
const SCALES: [(u64, &str); 6] = [
    (1_000_000_000_000_000_000, "quintillion"),
    (1_000_000_000_000_000, "quadrillion"),
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

/// Cardinal words for `n`, e.g. `"one hundred twenty-three"`.
pub fn cardinal(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }
    let mut words: Vec<String> = Vec::new();
    let mut rest = n;
    for (scale, name) in SCALES {
        let count = rest.div_euclid(scale);
        if count > 0 {
            words.push(format!("{} {name}", below_thousand(count)));
            rest %= scale;
        }
    }
    if rest > 0 {
        words.push(below_thousand(rest));
    }
    words.join(" ")
}

fn below_thousand(n: u64) -> String {
    let hundreds = n.div_euclid(100);
    let rest = n % 100;
    let mut parts = Vec::new();
    if hundreds > 0 {
        parts.push(format!("{} hundred", digit_word(hundreds)));
    }
    if rest > 0 {
        parts.push(below_hundred(rest));
    }
    parts.join(" ")
}

fn below_hundred(n: u64) -> String {
    let tens = n.div_euclid(10);
    let ones = n % 10;
    match (tens, ones) {
        (0 | 1, _) => digit_word(n).to_string(),
        (_, 0) => TENS.get(tens as usize).copied().unwrap_or_default().to_string(),
        _ => format!(
            "{}-{}",
            TENS.get(tens as usize).copied().unwrap_or_default(),
            digit_word(ones)
        ),
    }
}

fn digit_word(n: u64) -> &'static str {
    usize::try_from(n)
        .ok()
        .and_then(|i| ONES.get(i))
        .copied()
        .unwrap_or_default()
}

/// Ordinal words for `n`, e.g. `"twenty-first"`.
pub fn ordinal(n: u64) -> String {
    let words = cardinal(n);
    let split = words.rfind([' ', '-']).map_or(0, |i| i + 1);
    let (head, last) = words.split_at(split);
    let last = if let Some((_, irregular)) = IRREGULAR_ORDINALS.iter().find(|(c, _)| *c == last) {
        (*irregular).to_string()
    } else if last == "twelve" {
        "twelfth".to_string()
    } else if let Some(stem) = last.strip_suffix('y') {
        format!("{stem}ieth")
    } else {
        format!("{last}th")
    };
    format!("{head}{last}")
}

/// Spell out a numeral such as `42`, `-3` or `2.75`.
///
/// Ordinals apply only to non-negative integers; other forms are read as
/// cardinals. Returns `None` when `text` is not a numeral or the integer
/// part does not fit in a `u64`.
pub fn spell_numeral(text: &str, as_ordinal: bool) -> Option<String> {
    let text = text.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(integer) || fraction.is_some_and(|f| !all_digits(f)) {
        return None;
    }
    let value: u64 = integer.parse().ok()?;

    let mut spoken = String::new();
    if negative {
        spoken.push_str("negative ");
    }
    match fraction {
        None if as_ordinal && !negative => spoken.push_str(&ordinal(value)),
        None => spoken.push_str(&cardinal(value)),
        Some(digits) => {
            spoken.push_str(&cardinal(value));
            spoken.push_str(" point");
            for digit in digits.bytes() {
                spoken.push(' ');
                spoken.push_str(digit_word(u64::from(digit - b'0')));
            }
        }
    }
    Some(spoken)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinals() {
        assert_eq!(cardinal(0), "zero");
        assert_eq!(cardinal(13), "thirteen");
        assert_eq!(cardinal(40), "forty");
        assert_eq!(cardinal(123), "one hundred twenty-three");
        assert_eq!(cardinal(1_000_001), "one million one");
        assert_eq!(
            cardinal(u64::MAX),
            "eighteen quintillion four hundred forty-six quadrillion seven hundred forty-four \
             trillion seventy-three billion seven hundred nine million five hundred fifty-one \
             thousand six hundred fifteen"
        );
    }

    #[test]
    fn ordinals() {
        assert_eq!(ordinal(1), "first");
        assert_eq!(ordinal(2), "second");
        assert_eq!(ordinal(12), "twelfth");
        assert_eq!(ordinal(20), "twentieth");
        assert_eq!(ordinal(21), "twenty-first");
        assert_eq!(ordinal(100), "one hundredth");
        assert_eq!(ordinal(108), "one hundred eighth");
    }

    #[test]
    fn numerals() {
        assert_eq!(spell_numeral("-3", false).as_deref(), Some("negative three"));
        assert_eq!(spell_numeral("2.50", false).as_deref(), Some("two point five zero"));
        assert_eq!(spell_numeral("3", true).as_deref(), Some("third"));
        assert_eq!(spell_numeral("-3", true).as_deref(), Some("negative three"));
        assert_eq!(spell_numeral("x", false), None);
        assert_eq!(spell_numeral("1.", false), None);
        assert_eq!(spell_numeral("99999999999999999999", false), None);
    }
}
