use crate::core::companion::{Companion, CompanionId};

fn companion_rows(default: CompanionId) -> Vec<String> {
    Companion::roster()
        .iter()
        .map(|companion| {
            let marker = if companion.id == default { "*" } else { " " };
            format!(
                "{marker} {:<6} {:<11} {} {}",
                companion.name,
                companion.id.as_str(),
                companion.mood().emoji(),
                companion.description
            )
        })
        .collect()
}

pub fn list_companions(default: CompanionId) {
    println!("💞 Available companions:");
    println!();
    for row in companion_rows(default) {
        println!("{row}");
    }
    println!();
    println!("* = default (change with 'chatbuddy set default-companion <name>')");
}
