use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::Feedback;

#[derive(Clone, Default)]
pub struct FeedbackTable {
    inner: Arc<RwLock<HashMap<(Uuid, Uuid), Feedback>>>,
}

impl FeedbackTable {
    /// At most one row per (user, reason); resubmission overwrites
    /// (spec.md §3).
    pub fn submit(&self, feedback: Feedback) -> Feedback {
        let key = Feedback::key(feedback.user_id, feedback.reason_id);
        self.inner.write().insert(key, feedback.clone());
        feedback
    }

    pub fn for_reason(&self, reason_id: Uuid) -> Vec<Feedback> {
        self.inner
            .read()
            .values()
            .filter(|f| f.reason_id == reason_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vote;
    use chrono::Utc;

    #[test]
    fn resubmission_overwrites_prior_vote() {
        let table = FeedbackTable::default();
        let user_id = Uuid::new_v4();
        let reason_id = Uuid::new_v4();
        table.submit(Feedback {
            id: Uuid::new_v4(),
            user_id,
            reason_id,
            vote: Vote::Helpful,
            created_at_utc: Utc::now(),
        });
        table.submit(Feedback {
            id: Uuid::new_v4(),
            user_id,
            reason_id,
            vote: Vote::NotHelpful,
            created_at_utc: Utc::now(),
        });
        let rows = table.for_reason(reason_id);
        assert_eq!(rows.len(), 1);
        assert!(matches!(rows[0].vote, Vote::NotHelpful));
    }
}
