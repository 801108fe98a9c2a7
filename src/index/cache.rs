use std::future::Future;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::core::Section;

/// 已构建索引的共享快照
pub type Sections = Arc<Vec<Section>>;

/// 单槽索引缓存（stale-while-revalidate）
///
/// - 槽为空：调用方同步等待构建，写入后返回
/// - 槽非空：立即返回旧值，同时后台重建并整体替换
///
/// 构建函数返回 `None` 表示本次构建没有任何可用数据：
/// 后台刷新保留旧快照；miss 路径写入空索引。
///
/// 读不阻塞读；`set` 通过 ArcSwap 整体切换，读者只会看到旧值或新值。
/// 没有全局构建锁：并发的两次构建谁后 `set` 谁生效。
#[derive(Default)]
pub struct IndexCache {
    slot: ArcSwapOption<Vec<Section>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` 表示尚未构建过（miss 状态）
    pub fn get(&self) -> Option<Sections> {
        self.slot.load_full()
    }

    pub fn is_present(&self) -> bool {
        self.slot.load().is_some()
    }

    pub fn set(&self, sections: Vec<Section>) -> Sections {
        let sections = Arc::new(sections);
        self.slot.store(Some(sections.clone()));
        sections
    }

    pub async fn fetch_or_refresh<F, Fut>(self: &Arc<Self>, build: F) -> Sections
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Option<Vec<Section>>> + Send + 'static,
    {
        match self.get() {
            Some(cached) => {
                tracing::trace!("Cache hit");
                // 后台刷新与请求生命周期解耦：请求取消不会中断它
                let _ = self.spawn_refresh(build);
                cached
            }
            None => {
                tracing::trace!("Cache miss");
                self.set(build().await.unwrap_or_default())
            }
        }
    }

    /// 后台重建并在完成后替换槽位；失败与重试都不在这里处理
    pub fn spawn_refresh<F, Fut>(self: &Arc<Self>, build: F) -> JoinHandle<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Option<Vec<Section>>> + Send + 'static,
    {
        let cache = self.clone();
        tokio::spawn(
            async move {
                tracing::trace!("Prefetching...");
                match build().await {
                    Some(sections) => {
                        let n = sections.len();
                        cache.set(sections);
                        tracing::debug!("Background refresh installed {} sections", n);
                    }
                    None => {
                        tracing::debug!("Background refresh produced nothing usable, keeping cached index");
                    }
                }
            }
            .instrument(tracing::debug_span!("bg")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ItemRef;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    fn named(name: &str) -> Option<Vec<Section>> {
        Some(vec![Section::new(name, None, vec![ItemRef::new("1")])])
    }

    #[tokio::test]
    async fn miss_blocks_on_build_and_stores_result() {
        let cache = Arc::new(IndexCache::new());
        assert!(cache.get().is_none());

        let got = cache
            .fetch_or_refresh(|| async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                named("first")
            })
            .await;

        assert_eq!(got[0].name, "first");
        assert_eq!(cache.get().unwrap()[0].name, "first");
    }

    #[tokio::test]
    async fn empty_build_counts_as_present() {
        let cache = Arc::new(IndexCache::new());
        let got = cache.fetch_or_refresh(|| async { Some(Vec::new()) }).await;
        assert!(got.is_empty());
        assert!(cache.is_present());
    }

    #[tokio::test]
    async fn unusable_miss_build_stores_empty_index() {
        let cache = Arc::new(IndexCache::new());
        let got = cache.fetch_or_refresh(|| async { None }).await;
        assert!(got.is_empty());
        assert!(cache.is_present());
    }

    #[tokio::test]
    async fn unusable_refresh_keeps_last_good_snapshot() {
        let cache = Arc::new(IndexCache::new());
        cache.set(named("good").unwrap());
        cache.spawn_refresh(|| async { None }).await.unwrap();
        assert_eq!(cache.get().unwrap()[0].name, "good");
    }

    #[tokio::test]
    async fn hit_returns_stale_without_waiting_then_refreshes() {
        let cache = Arc::new(IndexCache::new());
        cache.set(named("stale").unwrap());

        let gate = Arc::new(Notify::new());
        let g = gate.clone();
        let got = tokio::time::timeout(
            Duration::from_secs(1),
            cache.fetch_or_refresh(move || async move {
                // 构建被挂起，直到测试放行
                g.notified().await;
                named("fresh")
            }),
        )
        .await
        .expect("cache hit must not wait for the build");

        assert_eq!(got[0].name, "stale");
        assert_eq!(cache.get().unwrap()[0].name, "stale");

        gate.notify_one();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            if cache.get().unwrap()[0].name == "fresh" {
                break;
            }
            if tokio::time::Instant::now() >= deadline {
                panic!("background refresh did not install the new index in time");
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test]
    async fn refresh_survives_caller_cancellation() {
        let cache = Arc::new(IndexCache::new());
        cache.set(named("stale").unwrap());

        let builds = Arc::new(AtomicUsize::new(0));
        let b = builds.clone();
        let handle = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .fetch_or_refresh(move || async move {
                        tokio::time::sleep(Duration::from_millis(30)).await;
                        b.fetch_add(1, Ordering::SeqCst);
                        named("fresh")
                    })
                    .await
            })
        };
        let stale = handle.await.unwrap();
        assert_eq!(stale[0].name, "stale");

        // 原请求早已结束，刷新结果仍需落入缓存
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while cache.get().unwrap()[0].name != "fresh" {
            if tokio::time::Instant::now() >= deadline {
                panic!("refresh was lost after the caller finished");
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_builds_do_not_wait_and_last_set_wins() {
        let cache = Arc::new(IndexCache::new());

        let started_a = Arc::new(Notify::new());
        let gate_a = Arc::new(Notify::new());
        let miss = {
            let cache = cache.clone();
            let (s, g) = (started_a.clone(), gate_a.clone());
            tokio::spawn(async move {
                cache
                    .fetch_or_refresh(move || async move {
                        s.notify_one();
                        g.notified().await;
                        named("slow-miss")
                    })
                    .await
            })
        };
        tokio::time::timeout(Duration::from_secs(1), started_a.notified())
            .await
            .expect("miss build never started");

        // miss 构建仍挂起时写入一个值，随后的请求走 hit 路径
        cache.set(named("mid").unwrap());

        let started_b = Arc::new(Notify::new());
        let gate_b = Arc::new(Notify::new());
        let (s, g) = (started_b.clone(), gate_b.clone());
        let got = cache
            .fetch_or_refresh(move || async move {
                s.notify_one();
                g.notified().await;
                named("refresh")
            })
            .await;
        assert_eq!(got[0].name, "mid");

        tokio::time::timeout(Duration::from_secs(1), started_b.notified())
            .await
            .expect("refresh must start while the miss build is still pending");
        assert!(!miss.is_finished());

        gate_b.notify_one();
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while cache.get().unwrap()[0].name != "refresh" {
            if tokio::time::Instant::now() >= deadline {
                panic!("refresh did not install its index");
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        // 较早开始、较晚完成的构建最后写入，覆盖刷新结果
        gate_a.notify_one();
        let slow = miss.await.unwrap();
        assert_eq!(slow[0].name, "slow-miss");
        assert_eq!(cache.get().unwrap()[0].name, "slow-miss");
    }

    #[tokio::test]
    async fn spawn_refresh_handle_can_be_awaited() {
        let cache = Arc::new(IndexCache::new());
        cache.set(named("a").unwrap());
        cache
            .spawn_refresh(|| async { named("b") })
            .await
            .unwrap();
        assert_eq!(cache.get().unwrap()[0].name, "b");
    }
}
