/// Read-through caching for recipe API calls.
///
/// Looks `$key` up in the cache first. On a miss (or when the cache cannot be
/// read) the `$block` future is awaited, its value is queued for a background
/// cache write with `$ttl` seconds to live, and the value is returned.
/// Errors from `$block` are propagated with `?` and never cached.
///
/// # Arguments
/// * `$cache`: a [`Cache`](crate::db::Cache)
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) for the value
/// * `$ttl`: time-to-live in seconds
/// * `$block`: future computing the value on a miss
///
/// # Example
/// ```rust,ignore
/// let details: RecipeDetails = cached!(self.cache, CacheKey::RecipeDetails(id), ttl, async move {
///     fetch_details(id).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_or_miss(&key).await {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
