#![allow(clippy::cast_precision_loss)]

/// How similar two names must be before one is suggested for the other
const THRESHOLD: f64 = 0.75;

/// Find the most similar name to the one given, if any are close enough
pub fn similarly_named<'a>(
  name: &str,
  options: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
  options
    .into_iter()
    .filter(|option| *option != name)
    .map(|option| (option, jaro_winkler_similarity(name, option)))
    .filter(|(_, similarity)| *similarity > THRESHOLD)
    .max_by(|(_, a), (_, b)| a.total_cmp(b))
    .map(|(option, _)| option.to_owned())
}

fn jaro_similarity(a: &str, b: &str) -> f64 {
  let a: Vec<char> = a.chars().collect();
  let b: Vec<char> = b.chars().collect();

  match (a.is_empty(), b.is_empty()) {
    (true, true) => return 1.0,
    (true, false) | (false, true) => return 0.0,
    (false, false) => {}
  }

  let window = (a.len().max(b.len()) / 2).saturating_sub(1);
  let mut a_matched = vec![false; a.len()];
  let mut b_matched = vec![false; b.len()];

  for (i, char_a) in a.iter().enumerate() {
    let start = i.saturating_sub(window);
    let end = (i + window + 1).min(b.len());

    for j in start..end {
      if !b_matched[j] && b[j] == *char_a {
        a_matched[i] = true;
        b_matched[j] = true;
        break;
      }
    }
  }

  let a_matches: Vec<char> = (a.iter().zip(&a_matched))
    .filter_map(|(c, matched)| matched.then_some(*c))
    .collect();
  let b_matches = (b.iter().zip(&b_matched)).filter_map(|(c, matched)| matched.then_some(*c));

  let matches = a_matches.len() as f64;
  if matches == 0.0 {
    return 0.0;
  }

  let transpositions = a_matches
    .iter()
    .zip(b_matches)
    .filter(|(a, b)| **a != *b)
    .count() as f64
    / 2.0;

  (matches / a.len() as f64 + matches / b.len() as f64 + (matches - transpositions) / matches)
    / 3.0
}

fn jaro_winkler_similarity(a: &str, b: &str) -> f64 {
  let similarity = jaro_similarity(a, b);
  let prefix_length = a
    .chars()
    .zip(b.chars())
    .take(4)
    .take_while(|(a, b)| a == b)
    .count();

  (0.1 * prefix_length as f64).mul_add(1.0 - similarity, similarity)
}
