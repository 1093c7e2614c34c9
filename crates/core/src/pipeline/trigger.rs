use serde::Serialize;

use crate::pipeline::config::{FetchMode, Layout, PipelineOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    NestedLazy,
    NestedInfinite,
    FlatLazy,
    FlatInfinite,
}

impl QueryKind {
    pub const ALL: [QueryKind; 4] = [
        QueryKind::NestedLazy,
        QueryKind::NestedInfinite,
        QueryKind::FlatLazy,
        QueryKind::FlatInfinite,
    ];

    pub fn lazy(layout: Layout) -> Self {
        match layout {
            Layout::Nested => QueryKind::NestedLazy,
            Layout::Flat => QueryKind::FlatLazy,
        }
    }

    pub fn infinite(layout: Layout) -> Self {
        match layout {
            Layout::Nested => QueryKind::NestedInfinite,
            Layout::Flat => QueryKind::FlatInfinite,
        }
    }

    pub fn layout(self) -> Layout {
        match self {
            QueryKind::NestedLazy | QueryKind::NestedInfinite => Layout::Nested,
            QueryKind::FlatLazy | QueryKind::FlatInfinite => Layout::Flat,
        }
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, QueryKind::NestedInfinite | QueryKind::FlatInfinite)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    Lazy(Layout),
    FirstPage(Layout),
}

impl FetchRequest {
    pub fn kind(self) -> QueryKind {
        match self {
            FetchRequest::Lazy(layout) => QueryKind::lazy(layout),
            FetchRequest::FirstPage(layout) => QueryKind::infinite(layout),
        }
    }
}

pub fn on_open<F>(options: &PipelineOptions, is_cached: F) -> Option<FetchRequest>
where
    F: Fn(QueryKind) -> bool,
{
    if !options.open {
        return None;
    }
    let layout = options.config.layout();
    let request = match options.config.fetch_mode() {
        FetchMode::Provided => return None,
        FetchMode::Infinite => FetchRequest::FirstPage(layout),
        FetchMode::Lazy => FetchRequest::Lazy(layout),
    };
    if is_cached(request.kind()) {
        return None;
    }
    Some(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::config::PipelineConfig;
    use crate::types::permalink::Permalink;

    fn options(config: PipelineConfig) -> PipelineOptions {
        PipelineOptions::new(Permalink::try_from("/r/rust/comments/abc/t").unwrap(), config)
    }

    #[test]
    fn closed_panel_fetches_nothing() {
        let mut opts = options(PipelineConfig::default());
        opts.open = false;
        assert_eq!(on_open(&opts, |_| false), None);
    }

    #[test]
    fn lazy_fetch_follows_layout() {
        let flat = options(PipelineConfig::default());
        assert_eq!(on_open(&flat, |_| false), Some(FetchRequest::Lazy(Layout::Flat)));
        let nested = options(PipelineConfig::default().nested(true));
        assert_eq!(
            on_open(&nested, |_| false),
            Some(FetchRequest::Lazy(Layout::Nested))
        );
    }

    #[test]
    fn cached_result_is_not_refetched() {
        let nested = options(PipelineConfig::default().nested(true));
        assert_eq!(on_open(&nested, |kind| kind == QueryKind::NestedLazy), None);
        assert_eq!(
            on_open(&nested, |kind| kind == QueryKind::FlatLazy),
            Some(FetchRequest::Lazy(Layout::Nested))
        );
    }

    #[test]
    fn provided_comments_suppress_fetch() {
        let opts = options(PipelineConfig::default().with_provided(Vec::new()));
        assert_eq!(on_open(&opts, |_| false), None);
    }

    #[test]
    fn infinite_mode_requests_first_page_once() {
        let opts = options(PipelineConfig::default().infinite(true));
        assert_eq!(on_open(&opts, |_| false), Some(FetchRequest::FirstPage(Layout::Flat)));
        assert_eq!(on_open(&opts, |kind| kind == QueryKind::FlatInfinite), None);
    }

    #[test]
    fn query_kind_round_trips_layout() {
        for kind in QueryKind::ALL {
            let rebuilt = if kind.is_infinite() {
                QueryKind::infinite(kind.layout())
            } else {
                QueryKind::lazy(kind.layout())
            };
            assert_eq!(rebuilt, kind);
        }
    }
}
