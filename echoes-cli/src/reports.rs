use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;

use echoes_planner::{
    Catalog, DisplaySettings, GearCell, PlannerReport, Preferences, ScoredItem, Section,
    Selection, encode, path_from_slug,
};

#[derive(Debug, Clone, Serialize)]
pub struct RegionLine {
    pub slot: Option<u8>,
    pub name: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MasteryLine {
    pub style: String,
    pub level: u8,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelicLine {
    pub tier: String,
    pub order: u8,
    pub name: String,
    pub code: String,
}

/// Human-facing view of a selection and its canonical link.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionSummary {
    pub path: String,
    pub regions: Vec<RegionLine>,
    pub masteries: Vec<MasteryLine>,
    pub relics: Vec<RelicLine>,
    pub masteries_total: u8,
}

impl SelectionSummary {
    pub fn new(catalog: &Catalog, selection: &Selection) -> Self {
        let mut regions: Vec<RegionLine> = selection
            .regions
            .iter()
            .map(|r| RegionLine {
                slot: r.slot,
                name: r.name.clone(),
                code: r.code.clone(),
            })
            .collect();
        // defaults first, then slots in priority order
        regions.sort_by_key(|r| r.slot.unwrap_or(0));

        let masteries = selection
            .masteries
            .iter()
            .map(|m| MasteryLine {
                style: m.style.label().to_string(),
                level: m.level,
                name: catalog.mastery(m.style, m.level).map(|c| c.name.clone()),
            })
            .collect();

        let mut relics: Vec<RelicLine> = selection
            .relics
            .iter()
            .map(|r| RelicLine {
                tier: catalog
                    .relic_by_code(&r.code)
                    .map_or_else(|| r.order.to_string(), |relic| relic.tier_label()),
                order: r.order,
                name: r.name.clone(),
                code: r.code.clone(),
            })
            .collect();
        relics.sort_by_key(|r| r.order);

        Self {
            path: path_from_slug(&encode(selection)),
            regions,
            masteries,
            relics,
            masteries_total: selection.mastery_total(),
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    let json_output = serde_json::to_string_pretty(value)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn console_selection(out: &mut dyn Write, summary: &SelectionSummary) -> Result<()> {
    writeln!(out, "{}", "🧭 Selection".bright_cyan().bold())?;
    writeln!(out, "{}", "============".cyan())?;
    writeln!(out, "Path: {}", summary.path.green())?;
    writeln!(out)?;
    for region in &summary.regions {
        let slot = region
            .slot
            .map_or_else(|| "default".to_string(), |s| format!("slot {s}"));
        writeln!(out, "  🗺️  {} ({slot})", region.name.bold())?;
    }
    for mastery in &summary.masteries {
        let name = mastery.name.as_deref().unwrap_or("-");
        writeln!(out, "  ⚔️  {} {} - {name}", mastery.style, mastery.level)?;
    }
    writeln!(out, "  Mastery points: {}", summary.masteries_total)?;
    for relic in &summary.relics {
        writeln!(out, "  ✨ {}: {} [{}]", relic.tier, relic.name.bold(), relic.code)?;
    }
    Ok(())
}

pub fn markdown_selection(out: &mut dyn Write, summary: &SelectionSummary) -> Result<()> {
    writeln!(out, "# Raging Echoes Selection\n")?;
    writeln!(out, "**Path:** `{}`\n", summary.path)?;
    writeln!(out, "| Slot | Region | Code |")?;
    writeln!(out, "|------|--------|------|")?;
    for region in &summary.regions {
        let slot = region
            .slot
            .map_or_else(|| "default".to_string(), |s| s.to_string());
        let code = region.code.as_deref().unwrap_or("-");
        writeln!(out, "| {slot} | {} | {code} |", region.name)?;
    }
    if !summary.masteries.is_empty() {
        writeln!(out, "\n## Masteries\n")?;
        for mastery in &summary.masteries {
            writeln!(out, "- {} {}", mastery.style, mastery.level)?;
        }
    }
    if !summary.relics.is_empty() {
        writeln!(out, "\n## Relics\n")?;
        for relic in &summary.relics {
            writeln!(out, "- {}: {} (`{}`)", relic.tier, relic.name, relic.code)?;
        }
    }
    Ok(())
}

pub fn console_report(
    out: &mut dyn Write,
    summary: &SelectionSummary,
    report: &PlannerReport,
    display: &DisplaySettings,
) -> Result<()> {
    writeln!(out, "{}", "📊 Planner Report".bright_cyan().bold())?;
    writeln!(out, "{}", "=================".cyan())?;
    writeln!(out, "Path: {}", summary.path.green())?;
    if !report.has_selections {
        writeln!(out, "{}", "No regions, masteries or relics selected yet.".yellow())?;
    }

    for section in Section::ALL {
        if !display.is_visible(section) {
            continue;
        }
        writeln!(out)?;
        writeln!(out, "{}", section.title().bright_yellow().bold())?;
        match section {
            Section::Regions => {
                for region in &summary.regions {
                    writeln!(out, "  • {}", region.name)?;
                }
            }
            Section::Masteries => {
                writeln!(out, "  Points spent: {}", report.masteries_total)?;
                for mastery in &summary.masteries {
                    writeln!(out, "  • {} {}", mastery.style, mastery.level)?;
                }
            }
            Section::Relics => {
                for relic in &summary.relics {
                    writeln!(out, "  • {}: {}", relic.tier, relic.name)?;
                }
            }
            Section::Skills => {
                for skill in &report.skills {
                    let rating = match skill.points {
                        0 => skill.rating.label().red(),
                        1 => skill.rating.label().yellow(),
                        _ => skill.rating.label().green(),
                    };
                    writeln!(out, "  {:14} {rating}", skill.name)?;
                    for note in &skill.notes {
                        writeln!(out, "      {} ({}): {}", note.source, note.value, note.note)?;
                    }
                }
            }
            Section::Prayers => console_scored(out, &report.prayers)?,
            Section::Spellbooks => console_scored(out, &report.spellbooks)?,
            Section::Runes => console_scored(out, &report.runes)?,
            Section::Bosses => console_names(out, &report.bosses)?,
            Section::SlayerMasters => console_names(out, &report.slayer_masters)?,
            Section::Minigames => console_names(out, &report.minigames)?,
            Section::Teleports => {
                for group in &report.teleports {
                    writeln!(out, "  {}", group.category.bold())?;
                    for stop in &group.stops {
                        let code = stop.code.as_deref().unwrap_or("");
                        writeln!(out, "    • {} {code}", stop.location)?;
                    }
                }
            }
            Section::Gear => {
                for cell in report.gear.iter().filter(|c| !c.items.is_empty()) {
                    writeln!(out, "  {}: {}", gear_heading(cell), gear_items(cell))?;
                }
            }
        }
    }
    Ok(())
}

fn console_scored(out: &mut dyn Write, items: &[ScoredItem]) -> Result<()> {
    for item in items {
        let mark = if item.points > 0 { "✅" } else { "❌" };
        writeln!(out, "  {mark} {}", item.name)?;
    }
    Ok(())
}

fn console_names(out: &mut dyn Write, names: &[String]) -> Result<()> {
    if names.is_empty() {
        writeln!(out, "  {}", "none".dimmed())?;
    }
    for name in names {
        writeln!(out, "  • {name}")?;
    }
    Ok(())
}

fn gear_heading(cell: &GearCell) -> String {
    format!("{} {} {}", cell.tier.label(), cell.style, cell.slot.label())
}

fn gear_items(cell: &GearCell) -> String {
    cell.items
        .iter()
        .map(|i| {
            if i.spec {
                format!("{} (spec)", i.name)
            } else {
                i.name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn markdown_report(
    out: &mut dyn Write,
    summary: &SelectionSummary,
    report: &PlannerReport,
    display: &DisplaySettings,
) -> Result<()> {
    writeln!(out, "# Raging Echoes Planner Report\n")?;
    writeln!(out, "**Path:** `{}`", summary.path)?;

    for section in Section::ALL {
        if !display.is_visible(section) {
            continue;
        }
        writeln!(out, "\n## {}\n", section.title())?;
        match section {
            Section::Regions => {
                for region in &summary.regions {
                    writeln!(out, "- {}", region.name)?;
                }
            }
            Section::Masteries => {
                for mastery in &summary.masteries {
                    writeln!(out, "- {} {}", mastery.style, mastery.level)?;
                }
            }
            Section::Relics => {
                for relic in &summary.relics {
                    writeln!(out, "- {}: {}", relic.tier, relic.name)?;
                }
            }
            Section::Skills => {
                writeln!(out, "| Skill | Rating | Points |")?;
                writeln!(out, "|-------|--------|--------|")?;
                for skill in &report.skills {
                    writeln!(
                        out,
                        "| {} | {} | {} |",
                        skill.name,
                        skill.rating.label(),
                        skill.points
                    )?;
                }
            }
            Section::Prayers | Section::Spellbooks | Section::Runes => {
                let items = match section {
                    Section::Prayers => &report.prayers,
                    Section::Spellbooks => &report.spellbooks,
                    _ => &report.runes,
                };
                for item in items {
                    let mark = if item.points > 0 { "x" } else { " " };
                    writeln!(out, "- [{mark}] {}", item.name)?;
                }
            }
            Section::Bosses => markdown_names(out, &report.bosses)?,
            Section::SlayerMasters => markdown_names(out, &report.slayer_masters)?,
            Section::Minigames => markdown_names(out, &report.minigames)?,
            Section::Teleports => {
                for group in &report.teleports {
                    let stops: Vec<&str> =
                        group.stops.iter().map(|s| s.location.as_str()).collect();
                    writeln!(out, "- **{}**: {}", group.category, stops.join(", "))?;
                }
            }
            Section::Gear => {
                for cell in report.gear.iter().filter(|c| !c.items.is_empty()) {
                    writeln!(out, "- **{}**: {}", gear_heading(cell), gear_items(cell))?;
                }
            }
        }
    }
    Ok(())
}

fn markdown_names(out: &mut dyn Write, names: &[String]) -> Result<()> {
    if names.is_empty() {
        writeln!(out, "_None._")?;
    }
    for name in names {
        writeln!(out, "- {name}")?;
    }
    Ok(())
}

/// JSON document of a report with hidden sections left out.
pub fn report_value(
    summary: &SelectionSummary,
    report: &PlannerReport,
    display: &DisplaySettings,
) -> Result<Value> {
    let mut doc = Map::new();
    doc.insert("path".to_string(), Value::String(summary.path.clone()));
    doc.insert("has_selections".to_string(), Value::Bool(report.has_selections));
    doc.insert(
        "masteries_total".to_string(),
        Value::from(report.masteries_total),
    );

    for section in Section::ALL.into_iter().filter(|s| display.is_visible(*s)) {
        let value = match section {
            Section::Regions => serde_json::to_value(&summary.regions)?,
            Section::Masteries => serde_json::to_value(&summary.masteries)?,
            Section::Relics => serde_json::to_value(&summary.relics)?,
            Section::Skills => serde_json::to_value(&report.skills)?,
            Section::Prayers => serde_json::to_value(&report.prayers)?,
            Section::Spellbooks => serde_json::to_value(&report.spellbooks)?,
            Section::Runes => serde_json::to_value(&report.runes)?,
            Section::Bosses => serde_json::to_value(&report.bosses)?,
            Section::SlayerMasters => serde_json::to_value(&report.slayer_masters)?,
            Section::Minigames => serde_json::to_value(&report.minigames)?,
            Section::Teleports => serde_json::to_value(&report.teleports)?,
            Section::Gear => serde_json::to_value(&report.gear)?,
        };
        doc.insert(section.key().to_string(), value);
    }
    Ok(Value::Object(doc))
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub regions: Vec<RegionLine>,
    pub relic_tiers: Vec<(String, Vec<String>)>,
    pub masteries: usize,
    pub skills: usize,
    pub bosses: usize,
    pub minigames: usize,
    pub teleports: usize,
    pub gear: usize,
}

impl CatalogSummary {
    pub fn new(catalog: &Catalog) -> Self {
        let regions = catalog
            .regions()
            .iter()
            .filter(|r| !r.hidden)
            .map(|r| RegionLine {
                slot: None,
                name: r.name.clone(),
                code: r.code.clone(),
            })
            .collect();
        let relic_tiers = catalog
            .relic_tiers()
            .into_iter()
            .filter_map(|order| {
                let relics: Vec<_> = catalog.relics_in_tier(order).collect();
                let label = relics.first()?.tier_label();
                let names = relics
                    .iter()
                    .map(|r| format!("{} [{}]", r.name, r.code))
                    .collect();
                Some((label, names))
            })
            .collect();
        Self {
            regions,
            relic_tiers,
            masteries: catalog.masteries().len(),
            skills: catalog.skills().len(),
            bosses: catalog.bosses().len(),
            minigames: catalog.minigames().len(),
            teleports: catalog.teleports().len(),
            gear: catalog.gear().len(),
        }
    }
}

pub fn console_catalog(out: &mut dyn Write, summary: &CatalogSummary) -> Result<()> {
    writeln!(out, "{}", "📚 Catalog".bright_cyan().bold())?;
    writeln!(out, "{}", "==========".cyan())?;
    writeln!(
        out,
        "Masteries: {}  Skills: {}  Bosses: {}  Minigames: {}  Teleports: {}  Gear: {}",
        summary.masteries,
        summary.skills,
        summary.bosses,
        summary.minigames,
        summary.teleports,
        summary.gear
    )?;
    writeln!(out)?;
    writeln!(out, "{}", "Regions".bright_yellow().bold())?;
    for region in &summary.regions {
        let code = region.code.as_deref().unwrap_or("-");
        writeln!(out, "  {code:4} {}", region.name)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", "Relics".bright_yellow().bold())?;
    for (tier, names) in &summary.relic_tiers {
        writeln!(out, "  {}: {}", tier.bold(), names.join(", "))?;
    }
    Ok(())
}

pub fn markdown_catalog(out: &mut dyn Write, summary: &CatalogSummary) -> Result<()> {
    writeln!(out, "# Raging Echoes Catalog\n")?;
    writeln!(out, "| Code | Region |")?;
    writeln!(out, "|------|--------|")?;
    for region in &summary.regions {
        let code = region.code.as_deref().unwrap_or("-");
        writeln!(out, "| {code} | {} |", region.name)?;
    }
    writeln!(out, "\n## Relics\n")?;
    for (tier, names) in &summary.relic_tiers {
        writeln!(out, "- **{tier}**: {}", names.join(", "))?;
    }
    Ok(())
}

pub fn console_prefs(out: &mut dyn Write, prefs: &Preferences) -> Result<()> {
    writeln!(out, "{}", "⚙️  Preferences".bright_cyan().bold())?;
    let lock = if prefs.locked {
        "locked".red()
    } else {
        "unlocked".green()
    };
    writeln!(out, "Selection: {lock}")?;
    for section in Section::ALL {
        let state = if prefs.display.is_visible(section) {
            "shown".green()
        } else {
            "hidden".dimmed()
        };
        writeln!(out, "  {:15} {state}", section.key())?;
    }
    Ok(())
}

pub fn markdown_prefs(out: &mut dyn Write, prefs: &Preferences) -> Result<()> {
    writeln!(out, "# Preferences\n")?;
    writeln!(out, "- Locked: {}", prefs.locked)?;
    for section in Section::ALL {
        let mark = if prefs.display.is_visible(section) { "x" } else { " " };
        writeln!(out, "- [{mark}] {}", section.title())?;
    }
    Ok(())
}
