//! Application context shared by every handler

use std::sync::Arc;

use crate::config::Config;
use crate::dialogue::{ParticipantId, UNCONFIGURED_ADMIN};
use crate::localization::Localizer;
use crate::state_store::ConversationStore;
use crate::transport::Transport;

use super::ui_builder::Labels;

/// Everything a relay flow needs, built once at startup
pub struct AppContext {
    pub transport: Arc<dyn Transport>,
    pub store: ConversationStore,
    pub admin: ParticipantId,
    pub localizer: Localizer,
    pub labels: Labels,
}

impl AppContext {
    pub fn new(
        transport: Arc<dyn Transport>,
        store: ConversationStore,
        admin: ParticipantId,
        localizer: Localizer,
    ) -> Self {
        let labels = Labels::from_localizer(&localizer);
        Self {
            transport,
            store,
            admin,
            localizer,
            labels,
        }
    }

    pub fn from_config(transport: Arc<dyn Transport>, config: &Config) -> Self {
        Self::new(
            transport,
            ConversationStore::new(config.state_ttl),
            config.admin_id,
            Localizer::new(&config.locale),
        )
    }

    /// Whether an administrator id was configured at all
    pub fn has_admin(&self) -> bool {
        self.admin != UNCONFIGURED_ADMIN
    }

    /// Always false while the administrator is unconfigured.
    pub fn is_admin(&self, id: ParticipantId) -> bool {
        self.has_admin() && id == self.admin
    }
}
