//! Registration document slots.
//!
//! Each multipart field name accepted by the upload endpoint identifies one document slot.
//! The slot's canonical name is embedded verbatim in the storage key.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Recognized registration document slots.
///
/// Five slots hold corporate documents, three hold the legal representative's documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentSlot {
    /// Articles of incorporation
    ArticlesOfIncorporation,
    /// Financial statement
    FinancialStatement,
    /// Owner identity document
    OwnerIdentity,
    /// Administrator identity document
    AdministratorIdentity,
    /// Power of attorney for the operator
    PowerOfAttorney,
    /// Representative tax ID document
    RepresentativeTaxId,
    /// Representative identity document
    RepresentativeIdentity,
    /// Representative proof of address
    RepresentativeProofOfAddress,
}

impl DocumentSlot {
    /// Look up the slot for a multipart field name. Matching is exact.
    pub fn from_field_name(field_name: &str) -> Option<Self> {
        match field_name {
            "admdoc1" => Some(DocumentSlot::ArticlesOfIncorporation),
            "admdoc2" => Some(DocumentSlot::FinancialStatement),
            "admdoc3" => Some(DocumentSlot::OwnerIdentity),
            "admdoc4" => Some(DocumentSlot::AdministratorIdentity),
            "admdoc5" => Some(DocumentSlot::PowerOfAttorney),
            "repdoc1" => Some(DocumentSlot::RepresentativeTaxId),
            "repdoc2" => Some(DocumentSlot::RepresentativeIdentity),
            "repdoc3" => Some(DocumentSlot::RepresentativeProofOfAddress),
            _ => None,
        }
    }

    /// Kebab-case name used in storage keys.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            DocumentSlot::ArticlesOfIncorporation => "adm-contrato-social",
            DocumentSlot::FinancialStatement => "adm-demonstracao-contabil",
            DocumentSlot::OwnerIdentity => "adm-documento-identidade-empresario",
            DocumentSlot::AdministratorIdentity => "adm-documento-identidade-administrador",
            DocumentSlot::PowerOfAttorney => "adm-procuracao-operador",
            DocumentSlot::RepresentativeTaxId => "rep-documento-cpf",
            DocumentSlot::RepresentativeIdentity => "rep-documento-rg",
            DocumentSlot::RepresentativeProofOfAddress => "rep-comprovante-endereco",
        }
    }
}

impl Display for DocumentSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.canonical_name())
    }
}
