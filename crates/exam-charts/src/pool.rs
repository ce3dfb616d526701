//! Chart surface lifecycle
//!
//! [`ChartInstancePool`] is the only thing allowed to add or remove chart
//! surfaces in the display container. Every render pass tears the previous
//! pass down completely before the first new surface is created.

use crate::surface::SurfaceSpec;
use exam_core::{ChartError, ChartResult};

// ============================================================================
// STRATEGY PATTERN: Surface Host
// ============================================================================

/// Where surfaces physically live
pub trait SurfaceHost {
    /// Owning handle of one live surface; releases nothing on its own
    type Handle;

    /// Build and attach one surface
    fn create(&mut self, spec: &SurfaceSpec) -> ChartResult<Self::Handle>;

    /// Detach a surface and release its chart instance and listeners
    fn destroy(&mut self, handle: Self::Handle) -> ChartResult<()>;

    /// Remove any node still left in the container
    fn clear_container(&mut self) -> ChartResult<()>;
}

// ============================================================================
// POOL
// ============================================================================

pub struct ChartInstancePool<H: SurfaceHost> {
    host: H,
    live: Vec<H::Handle>,
    passes: u64,
}

impl<H: SurfaceHost> ChartInstancePool<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            live: Vec::new(),
            passes: 0,
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Completed render passes
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Destroy every live surface, then clear the container.
    ///
    /// A surface that fails to destroy is logged and skipped; its node goes
    /// with the container clear. The pool owns no surface afterwards either way.
    pub fn teardown(&mut self) -> ChartResult<()> {
        let count = self.live.len();
        let mut failed = 0usize;

        for handle in self.live.drain(..) {
            if let Err(e) = self.host.destroy(handle) {
                failed += 1;
                tracing::warn!("Failed to destroy chart surface: {}", e);
            }
        }

        self.host.clear_container().map_err(|e| {
            tracing::error!("Failed to clear chart container: {}", e);
            ChartError::Teardown(e.to_string())
        })?;

        if count > 0 {
            tracing::debug!("Tore down {} chart surfaces ({} failed)", count, failed);
        }
        Ok(())
    }

    /// Replace every live surface with one per spec.
    ///
    /// Returns the number of live surfaces. On error nothing from this pass
    /// survives and the pool is empty.
    pub fn render(&mut self, specs: &[SurfaceSpec]) -> ChartResult<usize> {
        self.teardown()?;

        let mut created = Vec::with_capacity(specs.len());
        for spec in specs {
            match self.host.create(spec) {
                Ok(handle) => created.push(handle),
                Err(e) => {
                    tracing::error!("Failed to create surface {}: {}", spec.id(), e);
                    self.rollback(created);
                    return Err(e);
                }
            }
        }

        self.live = created;
        self.passes += 1;
        tracing::info!("Render pass {} mounted {} surfaces", self.passes, self.live.len());

        Ok(self.live.len())
    }

    fn rollback(&mut self, created: Vec<H::Handle>) {
        for handle in created {
            if let Err(e) = self.host.destroy(handle) {
                tracing::warn!("Failed to roll back chart surface: {}", e);
            }
        }
        if let Err(e) = self.host.clear_container() {
            tracing::warn!("Failed to clear chart container after rollback: {}", e);
        }
    }
}

impl<H: SurfaceHost> Drop for ChartInstancePool<H> {
    fn drop(&mut self) {
        if self.live.is_empty() {
            return;
        }
        if let Err(e) = self.teardown() {
            tracing::error!("Chart pool teardown on drop failed: {}", e);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::plan_surfaces;
    use exam_core::{ChartMode, Dataset, FieldId, Series, assign_datasets};
    use std::{cell::RefCell, rc::Rc};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Create(String),
        Destroy(u32),
        Clear,
    }

    #[derive(Default)]
    struct Log {
        events: Vec<Event>,
        attached: Vec<u32>,
    }

    /// In-memory host with failure injection
    #[derive(Default)]
    struct RecordingHost {
        log: Rc<RefCell<Log>>,
        next: u32,
        fail_create_at: Option<usize>,
        fail_destroy: bool,
        fail_clear: bool,
    }

    impl SurfaceHost for RecordingHost {
        type Handle = u32;

        fn create(&mut self, spec: &SurfaceSpec) -> ChartResult<u32> {
            if self.fail_create_at == Some(spec.index) {
                return Err(ChartError::Surface(format!("cannot build {}", spec.id())));
            }
            self.next += 1;
            let mut log = self.log.borrow_mut();
            log.events.push(Event::Create(spec.id()));
            log.attached.push(self.next);
            Ok(self.next)
        }

        fn destroy(&mut self, handle: u32) -> ChartResult<()> {
            let mut log = self.log.borrow_mut();
            log.events.push(Event::Destroy(handle));
            if self.fail_destroy {
                return Err(ChartError::Surface("destroy failed".into()));
            }
            log.attached.retain(|&h| h != handle);
            Ok(())
        }

        fn clear_container(&mut self) -> ChartResult<()> {
            if self.fail_clear {
                return Err(ChartError::Surface("container gone".into()));
            }
            let mut log = self.log.borrow_mut();
            log.events.push(Event::Clear);
            log.attached.clear();
            Ok(())
        }
    }

    fn datasets(n: usize, mode: ChartMode) -> Vec<Dataset> {
        let series = (0..n)
            .map(|i| Series {
                field_id: FieldId::new(format!("F{}", i)),
                label: format!("F{}", i),
                unit: String::new(),
                points: Vec::new(),
            })
            .collect();
        assign_datasets(series, mode)
    }

    fn specs(n: usize, mode: ChartMode) -> Vec<SurfaceSpec> {
        plan_surfaces(datasets(n, mode), mode, None)
    }

    fn pool() -> (ChartInstancePool<RecordingHost>, Rc<RefCell<Log>>) {
        let host = RecordingHost::default();
        let log = host.log.clone();
        (ChartInstancePool::new(host), log)
    }

    #[test]
    fn test_surface_count_follows_mode() {
        let (mut pool, log) = pool();

        assert_eq!(pool.render(&specs(4, ChartMode::Separate)).unwrap(), 4);
        assert_eq!(log.borrow().attached.len(), 4);

        assert_eq!(pool.render(&specs(4, ChartMode::Combined)).unwrap(), 1);
        assert_eq!(pool.live_count(), 1);
        assert_eq!(log.borrow().attached.len(), 1);
        assert_eq!(pool.passes(), 2);
    }

    #[test]
    fn test_destroy_before_create() {
        let (mut pool, log) = pool();
        pool.render(&specs(2, ChartMode::Separate)).unwrap();
        log.borrow_mut().events.clear();

        pool.render(&specs(1, ChartMode::Separate)).unwrap();

        let events = log.borrow().events.clone();
        assert_eq!(
            events,
            vec![
                Event::Destroy(1),
                Event::Destroy(2),
                Event::Clear,
                Event::Create("exam-chart-separate-0".into()),
            ]
        );
        // the previous pass's surfaces are gone
        assert_eq!(log.borrow().attached, vec![3]);
    }

    #[test]
    fn test_destroy_failure_still_clears_container() {
        let (mut pool, log) = pool();
        pool.render(&specs(3, ChartMode::Separate)).unwrap();
        pool.host.fail_destroy = true;

        assert!(pool.teardown().is_ok());
        assert_eq!(pool.live_count(), 0);
        assert!(log.borrow().attached.is_empty());
    }

    #[test]
    fn test_clear_failure_aborts_before_allocation() {
        let (mut pool, log) = pool();
        pool.render(&specs(2, ChartMode::Separate)).unwrap();
        pool.host.fail_clear = true;
        log.borrow_mut().events.clear();

        let err = pool.render(&specs(2, ChartMode::Separate)).unwrap_err();
        assert!(matches!(err, ChartError::Teardown(_)));
        assert_eq!(pool.live_count(), 0);
        assert!(
            !log.borrow()
                .events
                .iter()
                .any(|e| matches!(e, Event::Create(_)))
        );
    }

    #[test]
    fn test_create_failure_rolls_back_pass() {
        let (mut pool, log) = pool();
        pool.host.fail_create_at = Some(2);

        let err = pool.render(&specs(4, ChartMode::Separate)).unwrap_err();
        assert!(matches!(err, ChartError::Surface(_)));
        assert_eq!(pool.live_count(), 0);
        assert!(log.borrow().attached.is_empty());
        assert_eq!(pool.passes(), 0);
    }

    #[test]
    fn test_empty_plan_leaves_nothing() {
        let (mut pool, log) = pool();
        pool.render(&specs(3, ChartMode::Separate)).unwrap();

        assert_eq!(pool.render(&[]).unwrap(), 0);
        assert!(log.borrow().attached.is_empty());
    }

    #[test]
    fn test_drop_tears_down() {
        let (mut pool, log) = pool();
        pool.render(&specs(2, ChartMode::Separate)).unwrap();
        drop(pool);
        assert!(log.borrow().attached.is_empty());
    }
}
