use devereux_core::Paths;

fn main() {
    let paths = Paths::new();

    println!("=== Paths ===");
    println!("base:   {}", paths.base.display());
    println!("repos:  {}", paths.repos.display());
    println!("config: {}", paths.config_file.display());

    println!("\n=== Repository Files ===");
    match std::fs::read_dir(&paths.repos) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                println!("{}: {} bytes", entry.file_name().to_string_lossy(), size);
            }
        }
        Err(e) => println!("unavailable: {}", e),
    }
}
