#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

#[macro_export]
macro_rules! template {
    (
        name: $name:expr,
        kind: $kind:expr
        $(, buckets: $buckets:expr)?
        $(, priority: $priority:expr)?
        , matcher: $matcher:path
        $(,)?
    ) => {{
        $crate::Template {
            name: $name,
            kind: $kind,
            matcher: $matcher,
            buckets: {
                #[allow(unused_mut)]
                let mut mask = $crate::engine::BucketMask::empty();
                $( mask |= $buckets; )?
                mask
            },
            priority: { 0 $(+ $priority)? },
        }
    }};
}
