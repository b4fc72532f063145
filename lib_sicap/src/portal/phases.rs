//! Procedure phases accepted by the `sysProcedurePhaseId` filter of the
//! C-notice list. Informational only: the client forwards whatever id it is
//! given.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcedurePhase {
    SubmitBid,
    EvaluateQualificationTechnical,
    Deliberation,
    Awarded,
    ElectronicAuction,
    SubmitApplication,
    EvaluateApplication,
    FinancialEvaluation,
    ReBidding,
}

impl ProcedurePhase {
    pub const ALL: [ProcedurePhase; 9] = [
        ProcedurePhase::SubmitBid,
        ProcedurePhase::EvaluateQualificationTechnical,
        ProcedurePhase::Deliberation,
        ProcedurePhase::Awarded,
        ProcedurePhase::ElectronicAuction,
        ProcedurePhase::SubmitApplication,
        ProcedurePhase::EvaluateApplication,
        ProcedurePhase::FinancialEvaluation,
        ProcedurePhase::ReBidding,
    ];

    pub fn id(self) -> i64 {
        match self {
            ProcedurePhase::SubmitBid => 2,
            ProcedurePhase::EvaluateQualificationTechnical => 3,
            ProcedurePhase::Deliberation => 4,
            ProcedurePhase::Awarded => 5,
            ProcedurePhase::ElectronicAuction => 6,
            ProcedurePhase::SubmitApplication => 9,
            ProcedurePhase::EvaluateApplication => 10,
            ProcedurePhase::FinancialEvaluation => 11,
            ProcedurePhase::ReBidding => 12,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProcedurePhase::SubmitBid => "Submit Bid",
            ProcedurePhase::EvaluateQualificationTechnical => "Evaluate Qualification and Technical",
            ProcedurePhase::Deliberation => "Deliberation",
            ProcedurePhase::Awarded => "Awarded",
            ProcedurePhase::ElectronicAuction => "Electronic Auction",
            ProcedurePhase::SubmitApplication => "Submit Application",
            ProcedurePhase::EvaluateApplication => "Evaluate Application",
            ProcedurePhase::FinancialEvaluation => "Financial Evaluation",
            ProcedurePhase::ReBidding => "Re-bidding",
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }
}

impl fmt::Display for ProcedurePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
