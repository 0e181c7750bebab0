//! Fixed vocabularies the generator draws from.

use crate::domain::{Branch, Notification, NotificationKind};

pub const FIRST_NAMES: &[&str] = &[
    "Ana", "Beatriz", "Carolina", "Diana", "Elena", "Fernanda", "Gabriela", "Helena", "Isabela",
    "Julia", "Larissa", "Marina", "Natália", "Olivia", "Paula", "Rafaela", "Sofia", "Valentina",
    "Yasmin", "Bianca", "Camila", "Daniela", "Eduarda", "Flávia", "Giovanna",
];

pub const LAST_NAMES: &[&str] = &[
    "Silva", "Santos", "Oliveira", "Souza", "Rodrigues", "Ferreira", "Alves", "Pereira", "Lima",
    "Gomes", "Costa", "Ribeiro", "Martins", "Carvalho", "Almeida", "Lopes", "Soares", "Fernandes",
    "Vieira", "Barbosa",
];

pub const GUARDIAN_FIRST_NAMES: &[&str] = &[
    "Maria", "Ana", "Claudia", "Patricia", "Fernanda", "Roberto", "Carlos", "João",
];

pub const RELATIONSHIPS: &[&str] = &["Mãe", "Pai", "Avó", "Avô", "Tio(a)"];

pub const STREETS: &[&str] = &["das Flores", "Brasil", "São Paulo", "Voluntários", "Augusta"];

pub const NEIGHBOURHOODS: &[&str] = &["Centro", "Jardins", "Vila Mariana", "Pinheiros"];

pub const UNIFORM_ITEMS: &[&str] = &[
    "Collant",
    "Sapatilha",
    "Meia-calça",
    "Saia",
    "Conjunto completo",
];

pub const MAINTENANCE_JOBS: &[&str] = &[
    "Reparo ar-condicionado",
    "Manutenção piso",
    "Pintura",
    "Conserto espelhos",
];

pub const MARKETING_ACTIONS: &[&str] = &["Anúncios Instagram", "Flyers", "Banner externo"];

/// The school's locations.
pub fn branches() -> Vec<Branch> {
    vec![
        Branch::new(
            "centro",
            "Unidade Centro",
            "Rua das Flores, 123 - Centro",
            "(11) 3456-7890",
        ),
        Branch::new(
            "zona-sul",
            "Unidade Zona Sul",
            "Av. Paulista, 1500 - Zona Sul",
            "(11) 3456-7891",
        ),
        Branch::new(
            "zona-norte",
            "Unidade Zona Norte",
            "Rua Voluntários da Pátria, 800 - Zona Norte",
            "(11) 3456-7892",
        ),
    ]
}

/// Monthly rent charged to a branch.
pub fn rent_for(branch_id: &str) -> f64 {
    match branch_id {
        "centro" => 1500.0,
        "zona-sul" => 1800.0,
        _ => 1200.0,
    }
}

/// Teachers on a branch's payroll.
pub fn professors_for(branch_id: &str) -> u32 {
    match branch_id {
        "zona-sul" => 3,
        _ => 2,
    }
}

/// Header feed every session starts with.
pub fn notifications() -> Vec<Notification> {
    let entry = |id: &str,
                 title: &str,
                 message: &str,
                 time: &str,
                 read: bool,
                 kind: NotificationKind| Notification {
        id: id.to_string(),
        title: title.to_string(),
        message: message.to_string(),
        time: time.to_string(),
        read,
        kind,
    };
    vec![
        entry(
            "1",
            "Mensalidades a receber",
            "Há 5 mensalidades pendentes vencendo hoje. Confira agora.",
            "Há 2 horas",
            false,
            NotificationKind::Warning,
        ),
        entry(
            "2",
            "Pagamento recebido",
            "Maria Silva (Responsável por: Ana Silva) realizou o pagamento via PIX.",
            "Há 30 minutos",
            false,
            NotificationKind::Success,
        ),
        entry(
            "3",
            "Nova matrícula",
            "Novo aluno matriculado na Unidade Centro: Pedro Santos.",
            "Há 4 horas",
            true,
            NotificationKind::Info,
        ),
        entry(
            "4",
            "Pagamento recebido",
            "Roberto Oliveira (Responsável por: Julia Oliveira) realizou o pagamento em dinheiro.",
            "Há 5 horas",
            true,
            NotificationKind::Success,
        ),
    ]
}
