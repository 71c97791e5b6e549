//! Interpreter configuration.

/// What to do when a cell holds a value with no instruction bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UnknownOpcodePolicy {
    /// Log a warning and carry on without touching the IP.
    #[default]
    Warn,
    /// Reflect the IP, as for any other failed instruction.
    Reflect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VmConfig {
    /// Dimensionality of funge-space and of every IP.
    pub dimensions: usize,
    pub unknown_opcode: UnknownOpcodePolicy,
    /// Abort `run` after this many ticks.
    pub max_ticks: Option<u64>,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            dimensions: 2,
            unknown_opcode: UnknownOpcodePolicy::default(),
            max_ticks: None,
        }
    }
}

impl VmConfig {
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions.max(1);
        self
    }

    pub fn with_unknown_opcode(mut self, policy: UnknownOpcodePolicy) -> Self {
        self.unknown_opcode = policy;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }
}
