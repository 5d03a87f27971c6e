//! Bracket-style query strings understood by the CMS
//! (`pagination[page]=1`, `filters[title][$containsi]=x`, ...).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Ordered list of query pairs. Order is kept so requests are reproducible
/// in logs and mocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrapiQuery {
    pairs: Vec<(String, String)>,
}

impl StrapiQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, page: u32, page_size: u32) -> Self {
        self.push("pagination[page]", page.to_string())
            .push("pagination[pageSize]", page_size.to_string())
    }

    /// Populate one relation: `populate[name]=true`.
    pub fn populate(self, relation: &str) -> Self {
        self.push(format!("populate[{relation}]"), "true")
    }

    pub fn populate_all(self) -> Self {
        self.push("populate", "*")
    }

    pub fn sort(self, field: &str, direction: SortDirection) -> Self {
        self.push("sort", format!("{field}:{}", direction.as_str()))
    }

    /// Document status filter of the content-manager API. `draft` returns
    /// drafts and published documents alike.
    pub fn status(self, status: &str) -> Self {
        self.push("status", status)
    }

    /// Case-insensitive substring filter. Blank values are skipped.
    pub fn contains_i(self, field: &str, value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return self;
        }
        self.push(format!("filters[{field}][$containsi]"), value)
    }

    pub fn equals(self, field: &str, value: &str) -> Self {
        self.push(format!("filters[{field}][$eq]"), value)
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn push(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }
}
