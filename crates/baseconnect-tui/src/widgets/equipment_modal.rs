//! Success modal: the matched equipment record over a dimmed camera view

use baseconnect_core::Equipment;
use chrono::NaiveDate;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use super::modal_overlay::{dim_background, open_modal};
use crate::theme::{palette, styles};

const MODAL_WIDTH: u16 = 46;

pub struct EquipmentModal<'a> {
    equipment: &'a Equipment,
    today: NaiveDate,
}

impl<'a> EquipmentModal<'a> {
    /// `today` decides whether the expiry date is shown as passed.
    pub fn new(equipment: &'a Equipment, today: NaiveDate) -> Self {
        Self { equipment, today }
    }

    fn field(label: &str, value: String, value_style: Style) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{} ", label), Style::default().fg(palette::TEXT_ON_POPUP_MUTED)),
            Span::styled(value, value_style),
        ])
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let equipment = self.equipment;
        let strong = Style::default()
            .fg(palette::TEXT_ON_POPUP)
            .add_modifier(Modifier::BOLD);

        let mut badges = vec![Span::styled(
            format!(" {} ", equipment.state),
            styles::state_badge(equipment.is_active()),
        )];
        if let Some(category) = equipment.category.as_deref() {
            badges.push(Span::raw(" "));
            badges.push(Span::styled(format!(" {} ", category), styles::neutral_badge()));
        }

        let reference = if equipment.reference.is_empty() {
            "N/A".to_string()
        } else {
            equipment.reference.clone()
        };

        let mut lines = vec![
            Line::styled(equipment.name.clone(), strong),
            Line::from(badges),
            Line::default(),
            Self::field("Référence:", reference, strong),
        ];

        if let Some(label) = equipment.expiry_label() {
            let style = if equipment.is_expired(self.today) {
                strong.fg(palette::STATUS_RED)
            } else {
                strong
            };
            lines.push(Self::field("Expiration:", label, style));
        }
        if let Some(assignment) = equipment.assignment_label() {
            lines.push(Self::field("Affectation:", assignment, strong));
        }
        if let Some(location) = equipment.location.clone() {
            lines.push(Self::field("Localisation:", location, strong));
        }

        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled(" [s] Scanner ", styles::button_secondary()),
            Span::raw("   "),
            Span::styled(" [v] Voir fiche ", styles::button_primary()),
        ]));
        lines
    }
}

impl Widget for EquipmentModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        dim_background(buf, area);

        let lines = self.lines();
        let height = lines.len() as u16 + 3;
        let rect = open_modal(buf, area, MODAL_WIDTH, height);

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(styles::popup_block())
            .render(rect, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equipment(json: &str) -> Equipment {
        serde_json::from_str(json).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn render(equipment: &Equipment) -> Buffer {
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        EquipmentModal::new(equipment, today()).render(area, &mut buf);
        buf
    }

    fn text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// First cell of the first occurrence of `needle` in the rendered rows
    fn find(buf: &Buffer, needle: &str) -> Option<(u16, u16)> {
        let area = buf.area;
        for y in area.top()..area.bottom() {
            let cells: Vec<&str> = (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect();
            let row: String = cells.concat();
            if let Some(byte_idx) = row.find(needle) {
                let mut seen = 0;
                for (i, cell) in cells.iter().enumerate() {
                    if seen == byte_idx {
                        return Some((area.left() + i as u16, y));
                    }
                    seen += cell.len();
                }
            }
        }
        None
    }

    #[test]
    fn test_active_record() {
        let record = equipment(
            r#"{"id":"42","nom":"Casque F1","categorie":"Casque","reference":"CF1-01",
                "etat":"Actif","date_peremption":"2030-01-15"}"#,
        );
        let buf = render(&record);
        let out = text(&buf);

        assert!(out.contains("Casque F1"));
        assert!(out.contains(" Actif "));
        assert!(out.contains("Référence: CF1-01"));
        assert!(out.contains("Expiration: 15/01/2030"));
        assert!(out.contains("[s] Scanner"));
        assert!(out.contains("[v] Voir fiche"));

        let (x, y) = find(&buf, "Actif").unwrap();
        assert_eq!(buf[(x, y)].bg, palette::BADGE_OK_BG);
    }

    #[test]
    fn test_inactive_record_badge_is_red() {
        let record = equipment(r#"{"id":"1","nom":"Veste","etat":"Réformé"}"#);
        let buf = render(&record);

        let (x, y) = find(&buf, "Réformé").unwrap();
        assert_eq!(buf[(x, y)].bg, palette::BADGE_BAD_BG);
    }

    #[test]
    fn test_expired_date_in_red() {
        let record = equipment(
            r#"{"id":"1","nom":"Gants","etat":"Actif","date_peremption":"2024-12-31"}"#,
        );
        let buf = render(&record);

        let (x, y) = find(&buf, "31/12/2024").unwrap();
        assert_eq!(buf[(x, y)].fg, palette::STATUS_RED);
    }

    #[test]
    fn test_missing_optional_fields() {
        let record = equipment(r#"{"id":"1","nom":"Veste","etat":"Actif"}"#);
        let out = text(&render(&record));

        assert!(out.contains("Référence: N/A"));
        assert!(!out.contains("Expiration:"));
        assert!(!out.contains("Affectation:"));
    }

    #[test]
    fn test_assignment_and_location() {
        let record = equipment(
            r#"{"id":"1","nom":"Veste","etat":"Actif","localisation":"CIS Nord",
                "affectation_courante":{"nom":"Sgt Martin"}}"#,
        );
        let out = text(&render(&record));

        assert!(out.contains("Affectation: Sgt Martin"));
        assert!(out.contains("Localisation: CIS Nord"));
    }
}
