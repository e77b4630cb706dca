//! Idempotent script startup across first load and page transitions.
//!
//! Each named script moves through
//! `unregistered -> initialized -> torn down -> initialized -> ...`.
//! Re-registering a name tears the running instance down first unless the
//! script allows multiple instances.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::cleanup::Disposer;
use crate::error::SiteError;

/// A script's setup: attach everything, return what releases it.
pub type InitFn = Rc<dyn Fn() -> Result<Option<Disposer>, SiteError>>;

/// How [`InitManager::register`] treats a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptConfig {
    /// Tear the script down on every navigation start.
    pub reinit_on_navigation: bool,
    /// Allow several live instances under one name.
    pub allow_multiple: bool,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            reinit_on_navigation: true,
            allow_multiple: false,
        }
    }
}

/// How [`InitManager::register_script`] schedules a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterOptions {
    /// Run on first load only; survives navigation.
    pub run_once: bool,
    /// Re-run after every navigation-complete signal.
    pub auto_reinit: bool,
}

impl Default for RegisterOptions {
    fn default() -> Self {
        Self {
            run_once: false,
            auto_reinit: true,
        }
    }
}

impl RegisterOptions {
    /// First-load-only script.
    #[must_use]
    pub const fn once() -> Self {
        Self {
            run_once: true,
            auto_reinit: false,
        }
    }
}

struct ScriptInstance {
    name: String,
    disposer: Option<Disposer>,
    config: ScriptConfig,
}

struct ScheduledScript {
    name: String,
    init: InitFn,
    options: RegisterOptions,
}

impl ScheduledScript {
    fn config(&self) -> ScriptConfig {
        ScriptConfig {
            reinit_on_navigation: !self.options.run_once,
            allow_multiple: false,
        }
    }
}

/// Starts, re-starts and tears down named scripts.
#[derive(Default)]
pub struct InitManager {
    instances: RefCell<Vec<ScriptInstance>>,
    scheduled: RefCell<Vec<ScheduledScript>>,
    dom_ready: Cell<bool>,
}

impl InitManager {
    /// Manager that has not seen the DOM become interactive yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `init` now under `name`.
    ///
    /// Unless `config.allow_multiple`, a live instance of `name` is torn
    /// down first. Returns whether the script initialized; a failing
    /// `init` is logged and leaves the script uninitialized.
    pub fn register(
        &self,
        name: &str,
        init: &dyn Fn() -> Result<Option<Disposer>, SiteError>,
        config: ScriptConfig,
    ) -> bool {
        if !config.allow_multiple {
            self.teardown(name);
        }
        match init() {
            Ok(disposer) => {
                log::debug!("script '{name}' initialized");
                self.instances.borrow_mut().push(ScriptInstance {
                    name: name.to_owned(),
                    disposer,
                    config,
                });
                true
            }
            Err(e) => {
                log::error!("script '{name}' failed to initialize: {e}");
                false
            }
        }
    }

    /// Schedule `init` under `name`: it runs once the DOM is interactive
    /// (immediately if it already is) and, unless `run_once`, again after
    /// every navigation when `auto_reinit` is set.
    pub fn register_script(
        &self,
        name: &str,
        init: impl Fn() -> Result<Option<Disposer>, SiteError> + 'static,
        options: RegisterOptions,
    ) {
        let script = ScheduledScript {
            name: name.to_owned(),
            init: Rc::new(init),
            options,
        };
        let (init, config) = (Rc::clone(&script.init), script.config());
        {
            let mut scheduled = self.scheduled.borrow_mut();
            scheduled.retain(|s| s.name != name);
            scheduled.push(script);
        }
        if self.dom_ready.get() {
            let _ = self.register(name, &*init, config);
        }
    }

    /// The DOM became interactive: start every scheduled script that is
    /// not running yet, in registration order.
    pub fn dom_ready(&self) {
        if self.dom_ready.replace(true) {
            return;
        }
        for (name, init, config) in self.scheduled_snapshot(|_| true) {
            if !self.is_initialized(&name) {
                let _ = self.register(&name, &*init, config);
            }
        }
    }

    /// Navigation is starting: tear down every instance whose config asks
    /// for it.
    pub fn on_navigation_start(&self) {
        let torn: Vec<ScriptInstance> = {
            let mut instances = self.instances.borrow_mut();
            let (torn, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut *instances)
                .into_iter()
                .partition(|i| i.config.reinit_on_navigation);
            *instances = keep;
            torn
        };
        for instance in torn {
            Self::dispose(instance);
        }
    }

    /// Navigation completed: re-run every auto-reinit script.
    pub fn on_navigation_complete(&self) {
        if !self.dom_ready.get() {
            return;
        }
        let rerun =
            self.scheduled_snapshot(|s| !s.options.run_once && s.options.auto_reinit);
        for (name, init, config) in rerun {
            let _ = self.register(&name, &*init, config);
        }
    }

    /// Manually re-run a scheduled script.
    pub fn reinit(&self, name: &str) -> bool {
        let found = self.scheduled_snapshot(|s| s.name == name).into_iter().next();
        match found {
            Some((name, init, config)) => self.register(&name, &*init, config),
            None => {
                log::warn!("reinit of unknown script '{name}'");
                false
            }
        }
    }

    /// Tear down every live instance of `name`.
    pub fn teardown(&self, name: &str) {
        let torn: Vec<ScriptInstance> = {
            let mut instances = self.instances.borrow_mut();
            let (torn, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut *instances)
                .into_iter()
                .partition(|i| i.name == name);
            *instances = keep;
            torn
        };
        for instance in torn {
            Self::dispose(instance);
        }
    }

    /// Tear down every live instance regardless of config.
    pub fn teardown_all(&self) {
        let all = std::mem::take(&mut *self.instances.borrow_mut());
        for instance in all {
            Self::dispose(instance);
        }
    }

    /// Whether `name` has a live instance.
    #[must_use]
    pub fn is_initialized(&self, name: &str) -> bool {
        self.instances.borrow().iter().any(|i| i.name == name)
    }

    /// Number of live instances of `name`.
    #[must_use]
    pub fn instance_count(&self, name: &str) -> usize {
        self.instances
            .borrow()
            .iter()
            .filter(|i| i.name == name)
            .count()
    }

    fn scheduled_snapshot(
        &self,
        filter: impl Fn(&ScheduledScript) -> bool,
    ) -> Vec<(String, InitFn, ScriptConfig)> {
        self.scheduled
            .borrow()
            .iter()
            .filter(|s| filter(s))
            .map(|s| (s.name.clone(), Rc::clone(&s.init), s.config()))
            .collect()
    }

    fn dispose(instance: ScriptInstance) {
        if let Some(disposer) = instance.disposer {
            disposer.dispose_logged(&instance.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        inits: Rc<Cell<u32>>,
        teardowns: Rc<Cell<u32>>,
    }

    impl Probe {
        fn new() -> Self {
            Self {
                inits: Rc::new(Cell::new(0)),
                teardowns: Rc::new(Cell::new(0)),
            }
        }

        fn init(&self) -> impl Fn() -> Result<Option<Disposer>, SiteError> + 'static {
            let inits = Rc::clone(&self.inits);
            let teardowns = Rc::clone(&self.teardowns);
            move || {
                inits.set(inits.get() + 1);
                let t = Rc::clone(&teardowns);
                Ok(Some(Disposer::new(move || t.set(t.get() + 1))))
            }
        }
    }

    #[test]
    fn register_twice_tears_down_first_instance() {
        let manager = InitManager::new();
        let probe = Probe::new();
        let init = probe.init();
        assert!(manager.register("cursor", &init, ScriptConfig::default()));
        assert!(manager.register("cursor", &init, ScriptConfig::default()));
        assert_eq!(probe.inits.get(), 2);
        assert_eq!(probe.teardowns.get(), 1);
        assert_eq!(manager.instance_count("cursor"), 1);
    }

    #[test]
    fn allow_multiple_keeps_instances() {
        let manager = InitManager::new();
        let probe = Probe::new();
        let init = probe.init();
        let config = ScriptConfig {
            allow_multiple: true,
            ..ScriptConfig::default()
        };
        let _ = manager.register("reveal", &init, config);
        let _ = manager.register("reveal", &init, config);
        assert_eq!(manager.instance_count("reveal"), 2);
        manager.on_navigation_start();
        assert_eq!(probe.teardowns.get(), 2);
    }

    #[test]
    fn failing_init_is_not_marked_initialized() {
        let manager = InitManager::new();
        let ok = manager.register(
            "broken",
            &|| Err(SiteError::MissingElement("[data-slider]".into())),
            ScriptConfig::default(),
        );
        assert!(!ok);
        assert!(!manager.is_initialized("broken"));
    }

    #[test]
    fn register_script_waits_for_dom_ready() {
        let manager = InitManager::new();
        let probe = Probe::new();
        manager.register_script("slider", probe.init(), RegisterOptions::default());
        assert_eq!(probe.inits.get(), 0);
        manager.dom_ready();
        manager.dom_ready();
        assert_eq!(probe.inits.get(), 1);
        assert!(manager.is_initialized("slider"));
    }

    #[test]
    fn navigation_reinitializes_all_but_run_once() {
        let manager = InitManager::new();
        let page = Probe::new();
        let global = Probe::new();
        manager.register_script("filters", page.init(), RegisterOptions::default());
        manager.register_script("cursor", global.init(), RegisterOptions::once());
        manager.dom_ready();

        manager.on_navigation_start();
        manager.on_navigation_complete();
        manager.on_navigation_start();
        manager.on_navigation_complete();

        assert_eq!(page.inits.get(), 3);
        assert_eq!(page.teardowns.get(), 2);
        assert_eq!(global.inits.get(), 1);
        assert_eq!(global.teardowns.get(), 0);
        assert!(manager.is_initialized("cursor"));
    }

    #[test]
    fn manual_reinit_without_auto_reinit() {
        let manager = InitManager::new();
        let probe = Probe::new();
        manager.register_script(
            "loader",
            probe.init(),
            RegisterOptions {
                run_once: false,
                auto_reinit: false,
            },
        );
        manager.dom_ready();
        manager.on_navigation_start();
        manager.on_navigation_complete();
        assert!(!manager.is_initialized("loader"));
        assert!(manager.reinit("loader"));
        assert_eq!(probe.inits.get(), 2);
        assert!(!manager.reinit("missing"));
    }
}
