/// Example program to print the loaded configuration
///
/// Run with: cargo run -p motion-config --example print_config

fn main() {
    // Load configuration from motion.toml
    let config = motion_config::MotionConfig::load();

    println!("=== Chart Motion Configuration ===\n");

    println!("Render Settings:");
    println!("  Disable Animations: {}", config.render.disable_animations);
    println!("  Show Debug Lines: {}", config.render.show_debug_lines);
    println!("  Frame Interval: {}ms", config.render.frame_interval_ms);
    println!();

    println!("Throttle Settings:");
    println!("  Delay: {}ms", config.throttle.delay_ms);
    println!();

    println!("Animation Defaults:");
    println!("  Duration: {}ms", config.animation.duration_ms);
    println!("  Easing: {}", config.animation.easing);
    println!("  Repeat: {}", config.animation.repeat);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
