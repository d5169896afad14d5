/// Read-through caching over Redis.
///
/// Checks the cache for the given key and returns the cached value when
/// present. On a miss, runs the provided block, stores its result in the
/// cache via the background writer, and returns it.
///
/// # Arguments
/// * `$cache`: A cache with `get_from_cache` and `set_in_background`
///   methods.
/// * `$key`: The `CacheKey` under which the value is stored.
/// * `$ttl`: Time-to-live for the cached value in seconds.
/// * `$block`: The async block executed on a cache miss.
///
/// # Example
/// ```rust,ignore
/// let articles = cached!(
///     self.cache,
///     CacheKey::ArticleSearch(query.to_string()),
///     SEARCH_CACHE_TTL,
///     async move { fetch_articles_from_api(query).await }
/// );
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
