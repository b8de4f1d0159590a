//! Field Reconciler: folds one turn's candidate values into document state.
//!
//! The merge policy never erases known-good data with "nothing found":
//!
//! 1. Absent scalar -> unchanged
//! 2. Present scalar -> replaced, even by an empty string (the extractor
//!    only emits a scalar key when it extracted something)
//! 3. Present party -> each sub-field replaced only by a non-empty value
//!    (the extractor always emits all five sub-fields, so emptiness is the
//!    only "nothing new" signal)
//! 4. Absent party -> unchanged
//!
//! Each field's rule is independent of every other field, so the merge is
//! order-free, and the function is pure.

use crate::document::{CommonFields, DocumentFields, DocumentState, PartyInfo};
use crate::extraction::{FieldUpdate, PartialUpdate};

/// Merge a sparse candidate update into `current`, returning the new state.
pub fn reconcile(current: &DocumentState, candidate: &PartialUpdate) -> DocumentState {
    let mut next = current.clone();
    apply_common(&mut next.common, candidate);
    apply_specific(&mut next.fields, candidate);
    next
}

/// Merge party sub-fields, keeping existing values wherever the update is empty.
pub fn merge_party(existing: &PartyInfo, update: &PartyInfo) -> PartyInfo {
    fn pick(existing: &str, update: &str) -> String {
        if update.is_empty() {
            existing.to_string()
        } else {
            update.to_string()
        }
    }

    PartyInfo {
        name: pick(&existing.name, &update.name),
        title: pick(&existing.title, &update.title),
        company: pick(&existing.company, &update.company),
        notice_address: pick(&existing.notice_address, &update.notice_address),
        date: pick(&existing.date, &update.date),
    }
}

fn apply_party(target: &mut PartyInfo, update: &FieldUpdate<PartyInfo>) {
    if let FieldUpdate::Present(party) = update {
        *target = merge_party(target, party);
    }
}

fn apply_common(common: &mut CommonFields, c: &PartialUpdate) {
    c.purpose.apply_to(&mut common.purpose);
    c.effective_date.apply_to(&mut common.effective_date);
    c.governing_law.apply_to(&mut common.governing_law);
    c.jurisdiction.apply_to(&mut common.jurisdiction);
    apply_party(&mut common.party1, &c.party1);
    apply_party(&mut common.party2, &c.party2);
}

fn apply_specific(fields: &mut DocumentFields, c: &PartialUpdate) {
    match fields {
        DocumentFields::MutualNda(f) => {
            c.mnda_term_type.apply_to(&mut f.mnda_term_type);
            c.mnda_term_years.apply_to(&mut f.mnda_term_years);
            c.confidentiality_term_type
                .apply_to(&mut f.confidentiality_term_type);
            c.confidentiality_term_years
                .apply_to(&mut f.confidentiality_term_years);
            c.modifications.apply_to(&mut f.modifications);
        }
        DocumentFields::CloudService(f) => {
            c.provider_name.apply_to(&mut f.provider_name);
            c.customer_name.apply_to(&mut f.customer_name);
            c.subscription_period.apply_to(&mut f.subscription_period);
            c.technical_support.apply_to(&mut f.technical_support);
            c.fees.apply_to(&mut f.fees);
            c.payment_terms.apply_to(&mut f.payment_terms);
        }
        DocumentFields::Pilot(f) => {
            c.provider_name.apply_to(&mut f.provider_name);
            c.customer_name.apply_to(&mut f.customer_name);
            c.pilot_period.apply_to(&mut f.pilot_period);
            c.evaluation_purpose.apply_to(&mut f.evaluation_purpose);
            c.general_cap_amount.apply_to(&mut f.general_cap_amount);
        }
        DocumentFields::DesignPartner(f) => {
            c.provider_name.apply_to(&mut f.provider_name);
            c.customer_name.apply_to(&mut f.customer_name);
            c.program_name.apply_to(&mut f.program_name);
            c.feedback_requirements.apply_to(&mut f.feedback_requirements);
            c.access_period.apply_to(&mut f.access_period);
        }
        DocumentFields::Sla(f) => {
            c.provider_name.apply_to(&mut f.provider_name);
            c.customer_name.apply_to(&mut f.customer_name);
            c.uptime_target.apply_to(&mut f.uptime_target);
            c.response_time_commitment
                .apply_to(&mut f.response_time_commitment);
            c.service_credits.apply_to(&mut f.service_credits);
        }
        DocumentFields::ProfessionalServices(f) => {
            c.provider_name.apply_to(&mut f.provider_name);
            c.customer_name.apply_to(&mut f.customer_name);
            c.deliverables.apply_to(&mut f.deliverables);
            c.project_timeline.apply_to(&mut f.project_timeline);
            c.fees.apply_to(&mut f.fees);
            c.payment_schedule.apply_to(&mut f.payment_schedule);
            c.ip_ownership.apply_to(&mut f.ip_ownership);
        }
        DocumentFields::Partnership(f) => {
            c.partnership_scope.apply_to(&mut f.partnership_scope);
            c.trademark_rights.apply_to(&mut f.trademark_rights);
            c.revenue_share.apply_to(&mut f.revenue_share);
            c.fees.apply_to(&mut f.fees);
        }
        DocumentFields::SoftwareLicense(f) => {
            c.provider_name.apply_to(&mut f.provider_name);
            c.customer_name.apply_to(&mut f.customer_name);
            c.licensed_software.apply_to(&mut f.licensed_software);
            c.license_type.apply_to(&mut f.license_type);
            c.license_fees.apply_to(&mut f.license_fees);
            c.support_terms.apply_to(&mut f.support_terms);
        }
        DocumentFields::Dpa(f) => {
            c.provider_name.apply_to(&mut f.provider_name);
            c.customer_name.apply_to(&mut f.customer_name);
            c.data_subjects.apply_to(&mut f.data_subjects);
            c.processing_purpose.apply_to(&mut f.processing_purpose);
            c.data_categories.apply_to(&mut f.data_categories);
            c.subprocessors.apply_to(&mut f.subprocessors);
        }
        DocumentFields::Baa(f) => {
            c.provider_name.apply_to(&mut f.provider_name);
            c.customer_name.apply_to(&mut f.customer_name);
            c.phi_description.apply_to(&mut f.phi_description);
            c.permitted_uses.apply_to(&mut f.permitted_uses);
            c.safeguards.apply_to(&mut f.safeguards);
        }
        DocumentFields::AiAddendum(f) => {
            c.provider_name.apply_to(&mut f.provider_name);
            c.customer_name.apply_to(&mut f.customer_name);
            c.ai_features.apply_to(&mut f.ai_features);
            c.training_data_rights.apply_to(&mut f.training_data_rights);
            c.output_ownership.apply_to(&mut f.output_ownership);
        }
    }
}
