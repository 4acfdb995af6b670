use crate::{NetBalances, ResultEngine, net_balances};

use super::Engine;

impl Engine {
    /// Recomputes the group's net balances from the full ledger.
    ///
    /// Nothing is cached: every call reads the complete transaction set, so the
    /// result is always consistent with what has been appended.
    pub async fn net_balances(&self, group_id: &str) -> ResultEngine<NetBalances> {
        let debts = self.list_transactions(group_id).await?;
        tracing::debug!(group_id, debts = debts.len(), "netting group ledger");
        net_balances(&debts)
    }
}
