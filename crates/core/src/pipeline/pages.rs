use crate::domain::comments::{Listing, RawComment};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedPages {
    pub items: Vec<RawComment>,
    pub next_cursor: Option<String>,
}

pub fn merge_pages<'a, I>(pages: I) -> MergedPages
where
    I: IntoIterator<Item = &'a Listing>,
{
    let mut merged = MergedPages::default();
    let mut last = None;
    for page in pages {
        merged.items.extend(page.children.iter().cloned());
        last = Some(page);
    }
    merged.next_cursor = last.and_then(|page| page.after.clone());
    merged
}
