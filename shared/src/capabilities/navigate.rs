use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::model::ReportId;

/// Screen transitions the shell performs on the core's behalf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum NavigateOperation {
    /// Open the results screen for a saved report.
    OpenReport { report_id: ReportId, from_saved: bool },
}

impl Operation for NavigateOperation {
    type Output = ();
}

#[derive(Clone)]
pub struct Navigator<E> {
    context: CapabilityContext<NavigateOperation, E>,
}

impl<Ev> Capability<Ev> for Navigator<Ev> {
    type Operation = NavigateOperation;
    type MappedSelf<MappedEv> = Navigator<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Navigator::new(self.context.map_event(f))
    }
}

impl<E> Navigator<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<NavigateOperation, E>) -> Self {
        Self { context }
    }

    /// Fire-and-forget: the shell does not report back.
    pub fn open_report(&self, report_id: ReportId) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(NavigateOperation::OpenReport {
                report_id,
                from_saved: true,
            })
            .await;
        });
    }
}
