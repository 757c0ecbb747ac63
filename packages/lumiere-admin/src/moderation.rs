//! Resource-specific actions: comment approval and user role toggling.

use tracing::debug;

use crate::controller::{ActionOutcome, ResourceListController};
use crate::error::Result;
use crate::resource::{Comments, Users};

impl ResourceListController<Comments> {
    /// Approve a comment, then reload.
    pub async fn approve(&self, id: i64) -> Result<()> {
        self.run_action(&Comments::approve_path(id)).await
    }

    /// Comments on the cached page still awaiting approval.
    pub fn pending_count(&self) -> usize {
        self.items().iter().filter(|c| !c.is_approved).count()
    }
}

impl ResourceListController<Users> {
    /// Grant or revoke admin rights after confirmation, then reload.
    pub async fn toggle_admin<F>(&self, id: i64, confirm: F) -> Result<ActionOutcome>
    where
        F: FnOnce() -> bool,
    {
        if !confirm() {
            debug!(id, "Admin toggle declined");
            return Ok(ActionOutcome::Declined);
        }
        self.run_action(&Users::toggle_admin_path(id)).await?;
        Ok(ActionOutcome::Applied)
    }
}
