use serde::{Deserialize, Serialize};

use super::common::{Identifiable, NamedEntity};
use super::transaction::TransactionKind;

/// Category identifier used for tuition revenue.
pub const TUITION_CATEGORY_ID: &str = "rec-mensalidade";

/// Groups cash-flow transactions for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionCategory {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl TransactionCategory {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: TransactionKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            parent_id: None,
        }
    }

    /// The school's fixed revenue and expense catalog.
    pub fn catalog() -> Vec<TransactionCategory> {
        use TransactionKind::{Despesa, Receita};

        [
            (TUITION_CATEGORY_ID, "Mensalidades", Receita),
            ("rec-matricula", "Matrículas", Receita),
            ("rec-uniforme", "Venda de Uniformes", Receita),
            ("rec-material", "Venda de Materiais", Receita),
            ("rec-evento", "Eventos e Apresentações", Receita),
            ("rec-outros", "Outras Receitas", Receita),
            ("desp-aluguel", "Aluguel", Despesa),
            ("desp-salarios", "Salários e Encargos", Despesa),
            ("desp-professores", "Professores", Despesa),
            ("desp-manutencao", "Manutenção", Despesa),
            ("desp-utilidades", "Água/Luz/Internet", Despesa),
            ("desp-marketing", "Marketing", Despesa),
            ("desp-material", "Material de Escritório", Despesa),
            ("desp-limpeza", "Limpeza e Higiene", Despesa),
            ("desp-outros", "Outras Despesas", Despesa),
        ]
        .into_iter()
        .map(|(id, name, kind)| TransactionCategory::new(id, name, kind))
        .collect()
    }
}

impl Identifiable for TransactionCategory {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for TransactionCategory {
    fn name(&self) -> &str {
        &self.name
    }
}
