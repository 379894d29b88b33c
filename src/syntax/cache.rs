use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    num::NonZeroUsize,
    sync::{Mutex, MutexGuard, PoisonError},
};

use anyhow::Result;
use lru::LruCache;
use tree_sitter::Tree;

type CacheKey = (&'static str, u64, usize);

/// Parsed trees keyed by grammar and content.
///
/// Any edit changes the content hash, so a stale tree is never handed out for a newer snapshot.
pub struct TreeCache {
    trees: Mutex<LruCache<CacheKey, Tree>>,
}

impl std::fmt::Debug for TreeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeCache")
            .field("len", &self.lock().len())
            .finish()
    }
}

impl TreeCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            trees: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get_or_parse(
        &self,
        grammar: &'static str,
        content: &str,
        parse: impl FnOnce() -> Result<Tree>,
    ) -> Result<Tree> {
        let key = (grammar, hash_content(content), content.len());
        if let Some(tree) = self.lock().get(&key) {
            log::trace!("tree cache hit for {grammar}");
            return Ok(tree.clone());
        }

        let tree = parse()?;
        self.lock().put(key, tree.clone());
        Ok(tree)
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, Tree>> {
        self.trees.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn hash_content(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::build_tree;

    #[test]
    fn reuses_tree_for_identical_content() {
        let cache = TreeCache::new(4);
        let source = "const a = 1;";
        let mut parses = 0;
        for _ in 0..3 {
            cache
                .get_or_parse("typescript", source, || {
                    parses += 1;
                    build_tree(source, "a.ts")
                })
                .unwrap();
        }
        assert_eq!(parses, 1);
    }

    #[test]
    fn changed_content_is_reparsed() {
        let cache = TreeCache::new(4);
        let first = cache
            .get_or_parse("typescript", "const a = 1;", || build_tree("const a = 1;", "a.ts"))
            .unwrap();
        let second = cache
            .get_or_parse("typescript", "function b() {}", || {
                build_tree("function b() {}", "a.ts")
            })
            .unwrap();
        assert!(first.root_node().to_sexp().contains("(identifier)"));
        assert_ne!(first.root_node().to_sexp(), second.root_node().to_sexp());
    }
}
