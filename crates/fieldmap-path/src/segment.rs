/// One `.`-separated piece of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain object key.
    Key(&'a str),
    /// `name[index]`: look up `name`, then index into the array found there.
    Indexed { name: &'a str, index: usize },
}

impl<'a> Segment<'a> {
    /// The object key this segment looks up.
    #[must_use]
    pub fn name(&self) -> &'a str {
        match *self {
            Segment::Key(name) | Segment::Indexed { name, .. } => name,
        }
    }
}

/// Parse a single segment.
///
/// Only `name[digits]` with a non-empty, bracket-free name is indexed;
/// anything else, including XML attribute segments such as `item[@id]` and
/// chained indexes such as `grid[1][2]`, is a plain key.
#[must_use]
pub fn parse_segment(raw: &str) -> Segment<'_> {
    let indexed = raw
        .split_once('[')
        .and_then(|(name, rest)| rest.strip_suffix(']').map(|digits| (name, digits)))
        .filter(|(name, digits)| {
            !name.is_empty() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        })
        .and_then(|(name, digits)| digits.parse().ok().map(|index| (name, index)));

    match indexed {
        Some((name, index)) => Segment::Indexed { name, index },
        None => Segment::Key(raw),
    }
}

/// Split a path into segments. An empty path is a single empty key.
pub fn segments(path: &str) -> impl Iterator<Item = Segment<'_>> {
    path.split('.').map(parse_segment)
}
