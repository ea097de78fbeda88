pub(super) mod alerts;
pub(super) mod fleet;
pub(super) mod health;
pub(super) mod view;
