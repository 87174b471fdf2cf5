//! Native functions available to every program: narration, inventory, stats and utilities.

use aevum_value::{BuiltinVars, Host, NativeError, Value};
use std::time::{SystemTime, UNIX_EPOCH};

type NativeResult = Result<Value, NativeError>;

/// Returns the default [`BuiltinVars`] that should be used.
pub fn default_builtin_vars() -> BuiltinVars {
    let mut builtin_vars = BuiltinVars::new();
    // narration
    builtin_vars.add_native_fn("speak", &speak, 1);
    builtin_vars.add_native_fn("say", &say, 2);
    builtin_vars.add_native_fn("character", &character, 1);
    builtin_vars.add_native_fn("choice", &choice, 1);
    builtin_vars.add_native_fn("option", &option, 2);
    builtin_vars.add_native_fn("spawn", &spawn, 2);
    builtin_vars.add_native_fn("input", &input, 0);
    builtin_vars.add_native_fn("start", &start, 1);
    builtin_vars.add_native_fn("continue", &continue_, 0);
    builtin_vars.add_native_fn("restart", &restart, 0);
    builtin_vars.add_native_fn("endgame", &endgame, 1);
    builtin_vars.add_native_fn("action", &action, 1);
    builtin_vars.add_native_fn("trigger", &trigger, 1);
    builtin_vars.add_native_fn("win", &win, 1);
    builtin_vars.add_native_fn("lose", &lose, 1);
    // inventory
    builtin_vars.add_native_fn("add", &add, 1);
    builtin_vars.add_native_fn("inventory", &inventory, 0);
    builtin_vars.add_native_fn("use", &use_item, 1);
    builtin_vars.add_native_fn("item", &item, 1);
    // stats
    builtin_vars.add_native_fn("setStat", &set_stat, 3);
    builtin_vars.add_native_fn("modStat", &mod_stat, 3);
    builtin_vars.add_native_fn("getStat", &get_stat, 2);
    builtin_vars.add_native_fn("checkStats", &check_stats, 1);
    // utilities
    builtin_vars.add_native_fn("random", &random, 2);
    builtin_vars.add_native_fn("clock", &clock, 0);
    builtin_vars
}

fn number_arg(native: &str, value: &Value) -> Result<f64, NativeError> {
    value
        .cast_to_number()
        .ok_or_else(|| NativeError::new(format!("{} expects a number value.", native)))
}

/// Writes one line and returns `nil`.
fn narrate(host: &mut Host, line: impl std::fmt::Display) -> NativeResult {
    host.write_line(line)?;
    Ok(Value::Nil)
}

pub fn speak(host: &mut Host, args: &[Value]) -> NativeResult {
    narrate(host, &args[0])
}

pub fn say(host: &mut Host, args: &[Value]) -> NativeResult {
    narrate(host, format!("{}: \"{}\"", args[0], args[1]))
}

pub fn character(host: &mut Host, args: &[Value]) -> NativeResult {
    host.write_line("")?;
    narrate(host, format!("=== SCENE: {} ===", args[0]))
}

pub fn choice(host: &mut Host, args: &[Value]) -> NativeResult {
    host.write_line("")?;
    narrate(host, format!("??? CHOICE: {} ???", args[0]))
}

pub fn option(host: &mut Host, args: &[Value]) -> NativeResult {
    narrate(host, format!("   [{}] {}", args[0], args[1]))
}

pub fn spawn(host: &mut Host, args: &[Value]) -> NativeResult {
    narrate(host, format!("+++ SPAWN: {} ({}) appeared! +++", args[1], args[0]))
}

pub fn input(host: &mut Host, _args: &[Value]) -> NativeResult {
    let line = host.prompt("> ")?.unwrap_or_default();
    Ok(Value::from(line))
}

pub fn start(host: &mut Host, args: &[Value]) -> NativeResult {
    narrate(host, format!(">>> START: {} <<<", args[0]))
}

pub fn continue_(host: &mut Host, _args: &[Value]) -> NativeResult {
    narrate(host, "...")
}

pub fn restart(host: &mut Host, _args: &[Value]) -> NativeResult {
    host.world.reset();
    tracing::debug!("world state cleared");
    narrate(host, "<<< RESTART >>>")
}

pub fn endgame(host: &mut Host, args: &[Value]) -> NativeResult {
    narrate(host, format!("=== THE END: {} ===", args[0]))
}

pub fn action(host: &mut Host, args: &[Value]) -> NativeResult {
    narrate(host, format!("* {} *", args[0]))
}

pub fn trigger(host: &mut Host, args: &[Value]) -> NativeResult {
    narrate(host, format!("!!! EVENT: {} !!!", args[0]))
}

pub fn win(host: &mut Host, args: &[Value]) -> NativeResult {
    narrate(host, format!("*** VICTORY: {} ***", args[0]))
}

pub fn lose(host: &mut Host, args: &[Value]) -> NativeResult {
    narrate(host, format!("*** DEFEAT: {} ***", args[0]))
}

pub fn add(host: &mut Host, args: &[Value]) -> NativeResult {
    let item = args[0].to_string();
    host.write_line(format_args!("+ {} added to inventory", item))?;
    host.world.add_item(item);
    Ok(Value::Nil)
}

pub fn inventory(host: &mut Host, _args: &[Value]) -> NativeResult {
    let items = host.world.inventory();
    let count = items.len();
    let line = if items.is_empty() {
        "Inventory: (empty)".to_string()
    } else {
        format!("Inventory: {}", items.join(", "))
    };
    host.write_line(line)?;
    Ok(Value::Number(count as f64))
}

pub fn use_item(host: &mut Host, args: &[Value]) -> NativeResult {
    let item = args[0].to_string();
    if host.world.remove_item(&item) {
        host.write_line(format_args!("- used {}", item))?;
        Ok(Value::Bool(true))
    } else {
        host.write_line(format_args!("You don't have {}.", item))?;
        Ok(Value::Bool(false))
    }
}

pub fn item(host: &mut Host, args: &[Value]) -> NativeResult {
    Ok(Value::Bool(host.world.has_item(&args[0].to_string())))
}

pub fn set_stat(host: &mut Host, args: &[Value]) -> NativeResult {
    let value = number_arg("setStat", &args[2])?;
    let stored = host
        .world
        .set_stat(&args[0].to_string(), &args[1].to_string(), value);
    Ok(Value::Number(stored))
}

pub fn mod_stat(host: &mut Host, args: &[Value]) -> NativeResult {
    let delta = number_arg("modStat", &args[2])?;
    let stored = host
        .world
        .mod_stat(&args[0].to_string(), &args[1].to_string(), delta);
    Ok(Value::Number(stored))
}

pub fn get_stat(host: &mut Host, args: &[Value]) -> NativeResult {
    Ok(host
        .world
        .stat(&args[0].to_string(), &args[1].to_string())
        .map_or(Value::Nil, Value::Number))
}

pub fn check_stats(host: &mut Host, args: &[Value]) -> NativeResult {
    let who = args[0].to_string();
    let line = match host.world.stats(&who) {
        Some(stats) if !stats.is_empty() => {
            let stats: Vec<String> = stats
                .iter()
                .map(|(stat, value)| format!("{}={}", stat, Value::Number(*value)))
                .collect();
            format!("[{}] {}", who, stats.join(", "))
        }
        _ => format!("[{}] no stats", who),
    };
    narrate(host, line)
}

pub fn random(host: &mut Host, args: &[Value]) -> NativeResult {
    let low = number_arg("random", &args[0])?.ceil();
    let high = number_arg("random", &args[1])?.floor();
    // `i64::MAX as f64` rounds up to 2^63, which is itself out of range
    if !(low >= i64::MIN as f64 && high < i64::MAX as f64) {
        return Err(NativeError::new(format!(
            "random range [{}, {}] is out of bounds.",
            args[0], args[1]
        )));
    }
    if low > high {
        return Err(NativeError::new(format!(
            "random range [{}, {}] is empty.",
            args[0], args[1]
        )));
    }
    let roll = host.world.random_int(low as i64, high as i64);
    Ok(Value::Number(roll as f64))
}

pub fn clock(_host: &mut Host, _args: &[Value]) -> NativeResult {
    let since_the_epoch_secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| NativeError::new(format!("system clock is before the epoch: {}", err)))?
        .as_secs_f64();
    Ok(Value::Number(since_the_epoch_secs))
}
