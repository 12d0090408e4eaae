//! Text normalization and tokenization.

use unicode_segmentation::UnicodeSegmentation;

/// Replaces accented Latin letters by their ASCII spelling.
///
/// German umlauts expand to two letters (`ü` -> `ue`) the way names are
/// transliterated in author lists; other diacritics are simply dropped.
pub fn fold(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      'ä' => out.push_str("ae"),
      'ö' => out.push_str("oe"),
      'ü' => out.push_str("ue"),
      'Ä' => out.push_str("Ae"),
      'Ö' => out.push_str("Oe"),
      'Ü' => out.push_str("Ue"),
      'ß' => out.push_str("ss"),
      'æ' => out.push_str("ae"),
      'Æ' => out.push_str("Ae"),
      'œ' => out.push_str("oe"),
      'Œ' => out.push_str("Oe"),
      'à' | 'á' | 'â' | 'ã' | 'å' | 'ā' | 'ă' | 'ą' => out.push('a'),
      'À' | 'Á' | 'Â' | 'Ã' | 'Å' | 'Ā' | 'Ă' | 'Ą' => out.push('A'),
      'ç' | 'ć' | 'č' => out.push('c'),
      'Ç' | 'Ć' | 'Č' => out.push('C'),
      'ď' | 'đ' => out.push('d'),
      'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => out.push('e'),
      'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ė' | 'Ę' | 'Ě' => out.push('E'),
      'ğ' => out.push('g'),
      'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => out.push('i'),
      'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' | 'Į' | 'İ' => out.push('I'),
      'ł' => out.push('l'),
      'Ł' => out.push('L'),
      'ñ' | 'ń' | 'ň' => out.push('n'),
      'Ñ' | 'Ń' | 'Ň' => out.push('N'),
      'ò' | 'ó' | 'ô' | 'õ' | 'ø' | 'ō' | 'ő' => out.push('o'),
      'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ø' | 'Ō' | 'Ő' => out.push('O'),
      'ř' => out.push('r'),
      'ś' | 'š' | 'ş' | 'ș' => out.push('s'),
      'Ś' | 'Š' | 'Ş' | 'Ș' => out.push('S'),
      'ť' | 'ţ' | 'ț' => out.push('t'),
      'ù' | 'ú' | 'û' | 'ū' | 'ů' | 'ű' => out.push('u'),
      'Ù' | 'Ú' | 'Û' | 'Ū' | 'Ů' | 'Ű' => out.push('U'),
      'ý' | 'ÿ' => out.push('y'),
      'Ý' => out.push('Y'),
      'ź' | 'ż' | 'ž' => out.push('z'),
      'Ź' | 'Ż' | 'Ž' => out.push('Z'),
      _ => out.push(c),
    }
  }
  out
}

/// Tokenize text into folded, lowercased words.
pub fn tokenize(text: &str) -> Vec<String> {
  fold(text)
    .unicode_words()
    .map(|word| word.to_lowercase())
    .collect()
}

/// The normalized form of a whole value: its tokens joined by one space.
///
/// Prefix and whole-value equality checks compare normalized forms, so
/// punctuation, case and accents never decide a match.
pub fn normalize(text: &str) -> String {
  tokenize(text).join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tokenize_titles() {
    let tokens = tokenize("Über-Robust NER: Señor García's 2nd Try!");
    assert_eq!(tokens, vec!["ueber", "robust", "ner", "senor", "garcia's", "2nd", "try"]);
  }

  #[test]
  fn test_fold_accents() {
    assert_eq!(fold("Łukasz Józef"), "Lukasz Jozef");
    assert_eq!(fold("Straße"), "Strasse");
    assert_eq!(tokenize("Müller-Lüdenscheidt"), vec!["mueller", "luedenscheidt"]);
  }

  #[test]
  fn test_normalize_collapses_punctuation() {
    assert_eq!(normalize("  BERT:  Pre-training!! "), "bert pre training");
    assert_eq!(normalize("?!"), "");
  }
}
