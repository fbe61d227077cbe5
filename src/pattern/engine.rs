//! Pattern evaluation over a loaded graph
//!
//! Every pattern reads the store through shared references only. Forward hops
//! follow the outgoing adjacency; reverse hops ("which patients point at this
//! doctor") scan the edges of one relation type.

use super::catalog::{CatalogOutcome, Pattern, Scenario};
use super::{Anchor, GroundTruthSet, PatternError, PatternResult, NAME_ATTRIBUTE};
use crate::graph::{GraphStore, Label, NodeId, RelationType};
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

/// Evaluates ground-truth patterns against a read-only [`GraphStore`]
#[derive(Debug, Clone, Copy)]
pub struct PatternQueryEngine<'a> {
    store: &'a GraphStore,
}

impl<'a> PatternQueryEngine<'a> {
    pub fn new(store: &'a GraphStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a GraphStore {
        self.store
    }

    /// Run every scenario, collecting failures next to the successes
    pub fn run_catalog(&self, scenarios: &[Scenario]) -> CatalogOutcome {
        let mut outcome = CatalogOutcome::default();

        for scenario in scenarios {
            match self.evaluate(&scenario.pattern) {
                Ok(truth) => {
                    debug!(
                        scenario = %scenario.name,
                        pattern = scenario.pattern.kind(),
                        size = truth.len(),
                        "ground truth computed"
                    );
                    outcome.truths.insert(scenario.name.clone(), truth);
                }
                Err(e) => {
                    warn!(scenario = %scenario.name, error = %e, "scenario failed");
                    outcome.failures.insert(scenario.name.clone(), e);
                }
            }
        }

        info!(
            computed = outcome.truths.len(),
            failed = outcome.failures.len(),
            "pattern catalog evaluated"
        );
        outcome
    }

    /// Evaluate one pattern instance
    pub fn evaluate(&self, pattern: &Pattern) -> PatternResult<GroundTruthSet> {
        match pattern {
            Pattern::SharedProviderPeers { patient } => self.shared_provider_peers(patient),
            Pattern::Contraindications => Ok(self.contraindicated_patients()),
            Pattern::StatusWithCondition {
                condition,
                attribute,
                status,
            } => self.status_with_condition(condition, attribute, status),
            Pattern::ConditionAndMedication {
                condition,
                medication,
            } => self.condition_and_medication(condition, medication),
            Pattern::IndirectRisk { condition } => self.indirect_risk(condition),
            Pattern::SharedProviderRisk { condition } => self.shared_provider_risk(condition),
        }
    }

    /// Patients treated by any doctor of `patient_code`, excluding that patient
    pub fn shared_provider_peers(&self, patient_code: &str) -> PatternResult<GroundTruthSet> {
        let anchor = self.store.code_to_id(patient_code)?;
        let doctors: FxHashSet<NodeId> = self
            .store
            .outgoing(anchor, RelationType::TreatedBy)
            .collect();

        Ok(self.codes(
            self.patients_of(&doctors)
                .filter(|&patient| patient != anchor),
        ))
    }

    /// Patients prescribed a medication that is contraindicated for one of
    /// their own conditions
    pub fn contraindicated_patients(&self) -> GroundTruthSet {
        let conflicts: Vec<(NodeId, NodeId)> = self
            .store
            .edges_by_relation(RelationType::ContraindicatedFor)
            .into_iter()
            .map(|edge| (edge.source, edge.target))
            .collect();

        let mut truth = GroundTruthSet::new();
        for (code, patient) in self.store.patients() {
            let mut medications = FxHashSet::default();
            let mut conditions = FxHashSet::default();
            for (target, relation) in self.store.neighbors(patient) {
                match relation {
                    RelationType::PrescribedMedication => {
                        medications.insert(target);
                    }
                    RelationType::HasCondition => {
                        conditions.insert(target);
                    }
                    _ => {}
                }
            }

            let conflicted = conflicts.iter().any(|(medication, condition)| {
                medications.contains(medication) && conditions.contains(condition)
            });
            if conflicted {
                truth.insert(code.to_string());
            }
        }
        truth
    }

    /// Patients whose `attribute` contains `status` and who have `condition`
    ///
    /// `status` is matched as a literal substring, so "Current Smoker"
    /// matches every "Current Smoker (...)" variant and never "Former Smoker".
    pub fn status_with_condition(
        &self,
        condition: &Anchor,
        attribute: &str,
        status: &str,
    ) -> PatternResult<GroundTruthSet> {
        let condition = self.resolve(condition, Label::Condition)?;

        Ok(self
            .store
            .patients()
            .filter(|&(_, patient)| {
                self.store
                    .get_node(patient)
                    .and_then(|node| node.get_str(attribute))
                    .map_or(false, |value| value.contains(status))
            })
            .filter(|&(_, patient)| {
                self.store
                    .has_edge_to(patient, RelationType::HasCondition, condition)
            })
            .map(|(code, _)| code.to_string())
            .collect())
    }

    /// Patients with `condition` who are also prescribed `medication`
    pub fn condition_and_medication(
        &self,
        condition: &Anchor,
        medication: &Anchor,
    ) -> PatternResult<GroundTruthSet> {
        let condition = self.resolve(condition, Label::Condition)?;
        let medication = self.resolve(medication, Label::Medication)?;

        Ok(self
            .store
            .patients()
            .filter(|&(_, patient)| {
                self.store
                    .has_edge_to(patient, RelationType::HasCondition, condition)
                    && self
                        .store
                        .has_edge_to(patient, RelationType::PrescribedMedication, medication)
            })
            .map(|(code, _)| code.to_string())
            .collect())
    }

    /// Patients prescribed any medication contraindicated for `condition`
    pub fn indirect_risk(&self, condition: &Anchor) -> PatternResult<GroundTruthSet> {
        let condition = self.resolve(condition, Label::Condition)?;
        let risky: FxHashSet<NodeId> = self
            .store
            .edges_by_relation(RelationType::ContraindicatedFor)
            .into_iter()
            .filter(|edge| edge.ends_at(condition))
            .map(|edge| edge.source)
            .collect();
        debug!(condition = %condition, medications = risky.len(), "contraindicated medications");

        Ok(self
            .store
            .patients()
            .filter(|&(_, patient)| {
                self.store
                    .outgoing(patient, RelationType::PrescribedMedication)
                    .any(|medication| risky.contains(&medication))
            })
            .map(|(code, _)| code.to_string())
            .collect())
    }

    /// Every patient of every doctor who treats a patient with `condition`
    ///
    /// The result may contain patients without the condition.
    pub fn shared_provider_risk(&self, condition: &Anchor) -> PatternResult<GroundTruthSet> {
        let condition = self.resolve(condition, Label::Condition)?;

        let mut doctors = FxHashSet::default();
        for (_, patient) in self.store.patients() {
            if self
                .store
                .has_edge_to(patient, RelationType::HasCondition, condition)
            {
                doctors.extend(self.store.outgoing(patient, RelationType::TreatedBy));
            }
        }
        debug!(condition = %condition, doctors = doctors.len(), "doctors treating condition");

        Ok(self.codes(self.patients_of(&doctors)))
    }

    /// Sources of `TREATED_BY` edges pointing at any of `doctors`
    fn patients_of<'s>(
        &'s self,
        doctors: &'s FxHashSet<NodeId>,
    ) -> impl Iterator<Item = NodeId> + 's {
        self.store
            .edges_by_relation(RelationType::TreatedBy)
            .into_iter()
            .filter(move |edge| doctors.contains(&edge.target))
            .map(|edge| edge.source)
    }

    /// External codes of `ids`; ids without a code are dropped
    fn codes(&self, ids: impl IntoIterator<Item = NodeId>) -> GroundTruthSet {
        ids.into_iter()
            .filter_map(|id| self.store.code_of(id))
            .map(str::to_string)
            .collect()
    }

    fn resolve(&self, anchor: &Anchor, label: Label) -> PatternResult<NodeId> {
        match anchor {
            Anchor::Id(key) => Ok(self.store.resolve_key(key)?),
            Anchor::Name(name) => {
                let matches = self.store.nodes_by_attribute(label, NAME_ATTRIBUTE, name);
                if matches.len() > 1 {
                    warn!(%label, name = %name, matches = matches.len(), "ambiguous anchor, using first match");
                }
                matches
                    .first()
                    .copied()
                    .ok_or_else(|| PatternError::AnchorNotFound {
                        label,
                        attribute: NAME_ATTRIBUTE.to_string(),
                        value: name.clone(),
                    })
            }
        }
    }
}
