//! Seed the ticket table with sample data.
//!
//! Cycles through every priority and category so the dashboard filters and
//! sort orders have something to show on a fresh database.

use helpdesk_core::{TicketDraft, TicketPriority};
use helpdesk_web::db::{PgTicketStore, TicketStore};

use super::connect;

const CATEGORIES: [&str; 4] = ["suporte", "comercial", "financeiro", "outros"];

const SUBJECTS: [(&str, &str); 5] = [
    ("Não consigo acessar o sistema", "A tela de login retorna erro desde ontem."),
    ("Dúvida sobre a fatura", "O valor cobrado este mês está diferente do contrato."),
    ("Pedido de orçamento", "Gostaria de uma proposta para 20 licenças."),
    ("Relatório não exporta", "O botão de exportar PDF não faz nada."),
    ("Atualizar dados cadastrais", "Mudamos de endereço e precisamos atualizar o cadastro."),
];

/// Build the `n`-th sample draft.
fn sample_draft(n: u32) -> Option<TicketDraft> {
    let i = usize::try_from(n).ok()?;
    let (title, description) = SUBJECTS.get(i % SUBJECTS.len())?;
    let category = CATEGORIES.get(i % CATEGORIES.len())?;
    let priority = TicketPriority::ALL.get(i % TicketPriority::ALL.len())?;
    let email = format!("cliente{n}@example.com");

    TicketDraft::from_raw(
        &format!("{title} #{n}"),
        description,
        &format!("Cliente {n}"),
        if n % 2 == 0 { email.as_str() } else { "" },
        if n % 2 == 0 { "" } else { "(11) 99999-0000" },
        category,
        priority.as_str(),
    )
    .ok()
}

/// Insert `count` sample tickets.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn tickets(count: u32) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;
    let store = PgTicketStore::new(pool);

    let mut created = 0_u32;
    for n in 1..=count {
        let Some(draft) = sample_draft(n) else {
            continue;
        };
        let ticket = store.create_ticket(&draft).await?;
        tracing::debug!(ticket_id = %ticket.id, priority = %ticket.priority, "Seeded ticket");
        created += 1;
    }

    tracing::info!("Seeded {} tickets", created);
    Ok(())
}
