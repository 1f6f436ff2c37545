// Small free functions shared across the crate, carried from the teacher's
// own `util` module even though nothing here pulls in `clap` — they're
// plain convenience for building an `EngineConfig` or printing stats by
// hand (spec.md §0.2, §0.4).

use std::fmt::Display;

/// Parses sizes like `"400M"` or `"4G"` (binary-prefix, case-insensitive;
/// a bare suffixless number is taken as-is). Mirrors the teacher's
/// `-m`/`--memory` flag convenience, minus the `clap::value_parser` glue —
/// this is a plain `FromStr`-bound free function so it can be called
/// without a CLI framework driving it.
pub fn parse_abbrev_number<T>(src: &str) -> Result<T, String>
where
  T: TryFrom<u64>,
  T::Error: Display,
{
  let src = src.trim();
  let (digits, mult): (&str, u64) = match src.chars().last() {
    Some(c @ ('k' | 'K')) => (&src[..src.len() - c.len_utf8()], 1u64 << 10),
    Some(c @ ('m' | 'M')) => (&src[..src.len() - c.len_utf8()], 1u64 << 20),
    Some(c @ ('g' | 'G')) => (&src[..src.len() - c.len_utf8()], 1u64 << 30),
    _ => (src, 1),
  };
  let base: f64 = digits.trim().parse().map_err(|e| format!("invalid number '{src}': {e}"))?;
  let scaled = (base * mult as f64) as u64;
  T::try_from(scaled).map_err(|e| format!("value '{src}' out of range: {e}"))
}

/// Renders a count with underscore thousands separators, matching the
/// teacher's `main.rs::pretty_num` used by its stats block.
pub fn pretty_num(n: u64) -> String {
  n.to_string().as_bytes().rchunks(3).rev().map(|x| std::str::from_utf8(x).unwrap()).flat_map(|x| ["_", x]).skip(1).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_binary_suffixes() {
    assert_eq!(parse_abbrev_number::<usize>("4G").unwrap(), 4 << 30);
    assert_eq!(parse_abbrev_number::<usize>("400M").unwrap(), 400 << 20);
    assert_eq!(parse_abbrev_number::<usize>("1024").unwrap(), 1024);
  }

  #[test]
  fn pretty_num_inserts_separators() {
    assert_eq!(pretty_num(1_234_567), "1_234_567");
    assert_eq!(pretty_num(42), "42");
  }
}
