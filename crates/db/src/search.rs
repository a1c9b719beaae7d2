/// Free-text search term from `?q=`. Blank terms mean "no filter".
pub(crate) struct Needle<'a> {
    raw: &'a str,
    lower: String,
}

impl<'a> Needle<'a> {
    pub(crate) fn parse(q: Option<&'a str>) -> Option<Self> {
        let raw = q.filter(|q| !q.is_empty())?;
        Some(Self {
            raw,
            lower: raw.to_lowercase(),
        })
    }

    /// Case-insensitive substring match. Absent fields never match.
    pub(crate) fn in_text(&self, field: Option<&str>) -> bool {
        field.is_some_and(|f| f.to_lowercase().contains(&self.lower))
    }

    /// Exact-case substring match, used for dates, times and phone numbers.
    pub(crate) fn in_exact(&self, field: Option<&str>) -> bool {
        field.is_some_and(|f| f.contains(self.raw))
    }
}
