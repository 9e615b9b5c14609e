/// A macro to serve a tagged query from the in-memory query cache.
///
/// If the tag holds a fresh value it is returned as is. Otherwise the
/// provided future is awaited, and its value is stored under the tag unless
/// the tag was invalidated while the fetch was in flight.
///
/// # Arguments
/// * `$cache`: The `QueryCache` to read from and write to.
/// * `$tag`: The `CacheTag` the query provides.
/// * `$block`: The future that fetches the value on a miss.
///
/// # Example
/// ```rust,ignore
/// let recommendations = cached!(self.cache, CacheTag::Recommendations, async move {
///     fetch_recommendations().await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $tag:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_fresh(&$tag).await? {
            Ok(cached)
        } else {
            let generation = $cache.generation(&$tag).await;
            let value = $block.await?;
            $cache.store_if_current(&$tag, &value, generation).await;
            Ok(value)
        }
    }};
}
