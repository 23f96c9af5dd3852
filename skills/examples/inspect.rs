#![allow(missing_docs)]

use futures_lite::future::block_on;
use skill_router_skills::SkillLoader;

fn main() {
    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: inspect <registry path>...");
        std::process::exit(2);
    }

    let loader = paths
        .iter()
        .fold(SkillLoader::new(), |loader, path| loader.add_path(path));

    match block_on(loader.load_registry()) {
        Ok(registry) => {
            println!("Loaded {} skills", registry.len());
            for skill in registry.sorted() {
                println!(
                    "  {} (priority {}): {}",
                    skill.id,
                    skill.priority,
                    skill.triggers.join(", ")
                );
            }
        }
        Err(e) => {
            eprintln!("Load error: {e}");
            std::process::exit(1);
        }
    }
}
