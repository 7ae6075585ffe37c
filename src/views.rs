use std::cmp::Ordering;

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Table};

use crate::fmt::{euros, format_date, format_status, parse_date};
use crate::models::{DisplayReport, Report};
use crate::proof::{ProofPanel, MISSING_PROOF_MESSAGE};
use crate::routes::Route;

/// Everything the controller and pipelines ask the render layer to draw.
#[derive(Debug, Clone, Copy)]
pub enum Screen<'a> {
    Login,
    Loading(Route),
    Error { route: Route, message: &'a str },
    Bills(&'a [DisplayReport]),
    NewBill,
    /// Visible report counts per bucket: pending, accepted, refused.
    Dashboard { counts: [usize; 3] },
    Cards(&'a [&'a Report]),
    ReportForm(&'a Report),
    BigBilledIcon,
    Proof(&'a ProofPanel),
}

pub trait Renderer {
    fn render(&self, screen: &Screen) -> String;
}

/// Most recent first. Unparseable dates sort after every parseable one.
pub fn sort_by_date_desc(reports: &mut [DisplayReport]) {
    reports.sort_by(|a, b| {
        match (parse_date(&a.report.date), parse_date(&b.report.date)) {
            (Ok(da), Ok(db)) => db.cmp(&da),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => Ordering::Equal,
        }
    });
}

/// Plain terminal markup.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl TextRenderer {
    fn bills(&self, data: &[DisplayReport]) -> String {
        let mut rows = data.to_vec();
        sort_by_date_desc(&mut rows);

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec!["Id", "Type", "Nom", "Date", "Montant", "Statut", "Justificatif"]);
        for row in &rows {
            let proof = match row.report.proof_file_name.as_deref() {
                Some(name) if !name.is_empty() && name != "null" => name,
                _ => "-",
            };
            table.add_row(vec![
                Cell::new(&row.report.id),
                Cell::new(&row.report.category),
                Cell::new(&row.report.label),
                Cell::new(&row.date),
                Cell::new(euros(row.report.amount)),
                Cell::new(&row.status),
                Cell::new(proof),
            ]);
        }
        format!(
            "{}\n[btn-new-bill] Nouvelle note de frais\n{table}",
            "Mes notes de frais".bold()
        )
    }

    fn dashboard(&self, counts: &[usize; 3]) -> String {
        format!(
            "{}\n[arrow-icon1] En attente ({})\n[arrow-icon2] Validé ({})\n[arrow-icon3] Refusé ({})",
            "Validations".bold(),
            counts[0],
            counts[1],
            counts[2],
        )
    }

    fn card(&self, report: &Report) -> String {
        let local = report
            .owner_identity
            .split('@')
            .next()
            .unwrap_or_default();
        let (first, last) = match local.split_once('.') {
            Some((first, rest)) => (first, rest.split('.').next().unwrap_or_default()),
            None => ("", local),
        };
        let date = format_date(&report.date).unwrap_or_else(|_| report.date.clone());
        format!(
            "[open-bill{}] {} {} | {} | {} | {} | {}",
            report.id,
            first,
            last,
            report.label,
            euros(report.amount),
            date,
            report.category
        )
    }

    fn report_form(&self, report: &Report) -> String {
        let date = format_date(&report.date).unwrap_or_else(|_| report.date.clone());
        let mut out = vec![
            format!("{}", "Note de frais".bold()),
            format!("  Type de dépense:  {}", report.category),
            format!("  Nom de la dépense: {}", report.label),
            format!("  Date:             {date}"),
            format!("  Montant TTC:      {}", euros(report.amount)),
            format!("  TVA:              {}", report.vat_rate),
            format!("  %:                {}", report.proof_percent),
            format!("  Commentaire:      {}", report.comment),
            format!(
                "  Justificatif:     {} [icon-eye-d]",
                report.proof_file_name.as_deref().unwrap_or("-")
            ),
            format!("  Statut:           {}", format_status(report.status.as_str())),
        ];
        if let Some(comment) = &report.admin_comment {
            out.push(format!("  Commentaire admin: {comment}"));
        }
        out.push("[commentary2] [btn-accept-bill] Accepter  [btn-refuse-bill] Refuser".to_string());
        out.join("\n")
    }
}

impl Renderer for TextRenderer {
    fn render(&self, screen: &Screen) -> String {
        match screen {
            Screen::Login => format!(
                "{}\n[form-employee] Employé: email, mot de passe\n[form-admin] Administration: email, mot de passe",
                "Billed".bold()
            ),
            Screen::Loading(_) => "Loading...".to_string(),
            Screen::Error { route, message } => {
                format!("{} [{route}]\n{}", "Erreur".red().bold(), message)
            }
            Screen::Bills(data) => self.bills(data),
            Screen::NewBill => format!(
                "{}\n[form-new-bill] type, nom, date, montant, TVA, %, commentaire, justificatif",
                "Envoyer une note de frais".bold()
            ),
            Screen::Dashboard { counts } => self.dashboard(counts),
            Screen::Cards(reports) => reports
                .iter()
                .map(|r| self.card(r))
                .collect::<Vec<_>>()
                .join("\n"),
            Screen::ReportForm(report) => self.report_form(report),
            Screen::BigBilledIcon => "[big-billed-icon]".to_string(),
            Screen::Proof(ProofPanel::Image { url }) => format!("[bill-proof-container] {url}"),
            Screen::Proof(ProofPanel::Missing) => MISSING_PROOF_MESSAGE.red().to_string(),
        }
    }
}
