use colored::Colorize;
use qb_core::Attribute;

use super::{Context, plural, render_allocation};

/// Points requested per attribute by `qb allocate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Allocation {
    pub strength: u32,
    pub dexterity: u32,
    pub wisdom: u32,
    pub perception: u32,
}

impl Allocation {
    fn points(&self, attr: Attribute) -> u32 {
        match attr {
            Attribute::Strength => self.strength,
            Attribute::Dexterity => self.dexterity,
            Attribute::Wisdom => self.wisdom,
            Attribute::Perception => self.perception,
        }
    }

    fn total(&self) -> u32 {
        Attribute::ALL.iter().map(|&a| self.points(a)).sum()
    }
}

pub async fn show(ctx: &Context) -> Result<(), String> {
    let screen = ctx.status_screen().await?;
    if let (Some(character), Some(session)) = (screen.character(), screen.session()) {
        print!("{}", render_allocation(character, session));
    }
    Ok(())
}

pub async fn allocate(ctx: &Context, plan: Allocation, dry_run: bool) -> Result<(), String> {
    if plan.total() == 0 {
        return Err(
            "nothing to allocate; pass --strength, --dexterity, --wisdom or --perception".into(),
        );
    }

    let mut screen = ctx.status_screen().await?;

    let mut skipped = 0;
    for attr in Attribute::ALL {
        let wanted = plan.points(attr);
        skipped += wanted - screen.increase_by(attr, wanted);
    }

    if let (Some(character), Some(session)) = (screen.character(), screen.session()) {
        print!("{}", render_allocation(character, session));
    }

    if skipped > 0 {
        let available = screen.session().map_or(0, |s| s.initial_budget());
        println!(
            "\n  {}",
            format!(
                "{skipped} point{} not allocated: only {available} available",
                plural(skipped)
            )
            .yellow()
        );
    }

    let dirty = screen.session().is_some_and(|s| s.is_dirty());
    if !dirty {
        println!("\n  Nothing to commit.");
        return Ok(());
    }
    if dry_run {
        println!("\n  Dry run; nothing committed.");
        return Ok(());
    }

    screen.commit().await.map_err(|e| e.to_string())?;
    println!("\n  {}", "Attributes updated.".green());
    if let (Some(character), Some(session)) = (screen.character(), screen.session()) {
        print!("\n{}", render_allocation(character, session));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_totals() {
        let plan = Allocation {
            strength: 2,
            wisdom: 1,
            ..Allocation::default()
        };
        assert_eq!(plan.total(), 3);
        assert_eq!(plan.points(Attribute::Strength), 2);
        assert_eq!(plan.points(Attribute::Dexterity), 0);
    }
}
