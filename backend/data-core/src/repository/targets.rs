/// Which stores a mutation is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreTargets {
    pub remote: bool,
    pub local: bool,
}

impl StoreTargets {
    pub const NONE: StoreTargets = StoreTargets {
        remote: false,
        local: false,
    };
    pub const LOCAL: StoreTargets = StoreTargets {
        remote: false,
        local: true,
    };
    pub const REMOTE: StoreTargets = StoreTargets {
        remote: true,
        local: false,
    };
    pub const BOTH: StoreTargets = StoreTargets {
        remote: true,
        local: true,
    };

    pub fn is_empty(&self) -> bool {
        !self.remote && !self.local
    }
}
