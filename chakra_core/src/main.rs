//! Interactive console for poking the chakra engine by hand.
//!
//! Time is explicit: every command that needs a clock takes `t` in seconds,
//! so cooldown and hold behaviour can be stepped through deterministically.

use chakra_core::{classify, EngineConfig, FingerStates, Gesture, GestureLabel, JutsuEngine};
use std::io::{self, Write};
use std::path::Path;

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            Chakra Engine Console                     ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::load(Path::new(&path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("  ⚠  {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let mut engine = match JutsuEngine::new(&config) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("  ⚠  {}", e);
            std::process::exit(1);
        }
    };
    let mut now = 0.0;

    print_help();
    loop {
        let line = read_line(&format!("[t={:.2}] > ", now));
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, args)) = words.split_first() else { continue };

        match cmd.to_ascii_lowercase().as_str() {
            "f" | "fingers" => {
                // f 0 1 1 0 0 [dt]
                let bits: Vec<u8> = args.iter().take(5).filter_map(|a| a.parse().ok()).collect();
                let Ok(bits) = <[u8; 5]>::try_from(bits) else {
                    println!("  ⚠  need five 0/1 flags (thumb … pinky)");
                    continue;
                };
                now += parse_dt(args.get(5));
                let label = classify(FingerStates::from_bits(bits));
                println!("  classified: {}", label);
                step(&mut engine, Some(label), now);
            }
            "g" | "gesture" => {
                // g <name…> [dt]; name may contain spaces
                let (name_parts, dt) = split_trailing_number(args);
                let name = name_parts.join(" ");
                let Some(g) = Gesture::from_name(&name) else {
                    println!("  ⚠  unknown gesture {:?}", name);
                    continue;
                };
                now += dt;
                step(&mut engine, Some(GestureLabel::Recognized(g)), now);
            }
            "n" | "none" => {
                now += parse_dt(args.first());
                step(&mut engine, None, now);
            }
            "w" | "wait" => {
                let secs = parse_dt(args.first());
                let ticks = (secs * 30.0).round().max(1.0) as usize;
                for _ in 0..ticks {
                    now += secs / ticks as f64;
                    engine.tick(None, now);
                }
                println!("  advanced {:.2}s over {} empty ticks", secs, ticks);
            }
            "s" | "status" => print_status(&engine, now),
            "r" | "reset" => {
                engine.reset_chakra();
                println!("  chakra reset to maximum");
            }
            "h" | "help" | "?" => print_help(),
            "q" | "quit" => {
                println!("\nGoodbye!\n");
                break;
            }
            other => println!("  ⚠  unknown command {:?} (h for help)", other),
        }
    }
}

fn step(engine: &mut JutsuEngine, label: Option<GestureLabel>, now: f64) {
    match engine.tick(label, now) {
        Some(ev) => println!("  ✓ Activated: {}", ev.jutsu().name),
        None => match engine.confirmer().hold() {
            Some(h) => println!(
                "  holding {} for {:.2}s / {:.2}s",
                h.gesture,
                now - h.started_at,
                engine.confirmer().threshold()
            ),
            None => println!("  —"),
        },
    }
}

fn print_status(engine: &JutsuEngine, now: f64) {
    let pool = engine.pool();
    println!(
        "  chakra {:.1}/{:.0} ({:.0}%)  band {:?}",
        pool.level(), pool.capacity(), pool.percentage(), pool.level_band()
    );
    for g in Gesture::ALL {
        let cost = pool.cost(g).map_or("—".to_string(), |c| format!("{:.0}", c));
        let cd = pool.cooldown_remaining(g, now);
        let ready = if pool.can_activate(g, now) { "ready" } else { "" };
        println!("    {:<14} cost {:>3}  cooldown {:>4.1}s  {}", g.name(), cost, cd, ready);
    }
    println!("  active effects: {}", engine.effects().effects().len());
}

fn print_help() {
    println!("  f <t i m r p> [dt]  feed finger flags, e.g. `f 0 1 1 0 0 0.1`");
    println!("  g <gesture> [dt]    feed a named gesture, e.g. `g open palm 0.5`");
    println!("  n [dt]              no hand in view");
    println!("  w <secs>            let time pass with no hand (30 ticks/s)");
    println!("  s                   status");
    println!("  r                   reset chakra");
    println!("  q                   quit");
    println!();
}

fn parse_dt(arg: Option<&&str>) -> f64 {
    arg.and_then(|a| a.parse::<f64>().ok()).unwrap_or(0.0).max(0.0)
}

fn split_trailing_number<'a>(args: &'a [&'a str]) -> (&'a [&'a str], f64) {
    match args.split_last() {
        Some((last, rest)) => match last.parse::<f64>() {
            Ok(dt) => (rest, dt.max(0.0)),
            Err(_) => (args, 0.0),
        },
        None => (args, 0.0),
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf).unwrap_or(0) == 0 {
        return "q".to_string();
    }
    buf
}
