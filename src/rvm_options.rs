use std::sync::Arc;

#[derive(Clone, Copy)]
pub enum DurabilityLevel {
    Strong, //Log appends and segment file writes are fsynced before returning
    Weak, //Leave flushing to the OS page cache
}

#[derive(Clone)]
pub struct RvmOptions {
    pub durability_level: DurabilityLevel,
    pub use_debug_logging: bool,
}

impl Default for RvmOptions {
    fn default() -> Self {
        RvmOptions {
            durability_level: DurabilityLevel::Strong,
            use_debug_logging: false,
        }
    }
}

pub fn start_rvm_options_builder() -> RvmOptionsBuilder {
    RvmOptionsBuilder {
        options: RvmOptions::default()
    }
}

pub struct RvmOptionsBuilder {
    options: RvmOptions,
}

impl RvmOptionsBuilder {
    pub fn durability_level(&mut self, level: DurabilityLevel) -> &mut RvmOptionsBuilder {
        self.options.durability_level = level;
        self
    }

    pub fn use_debug_logging(&mut self, value: bool) -> &mut RvmOptionsBuilder {
        self.options.use_debug_logging = value;
        self
    }

    pub fn build_arc(&self) -> Arc<RvmOptions> {
        Arc::new(self.options.clone())
    }

    pub fn build(&self) -> RvmOptions {
        self.options.clone()
    }
}
