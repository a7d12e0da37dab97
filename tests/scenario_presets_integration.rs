use std::process::Command;

#[derive(Debug)]
struct Headline {
    panels: u32,
    total: f64,
    payback_years: f64,
}

#[test]
fn scenario_files_run_via_cli_and_produce_distinct_quotes() {
    let baseline = run_and_parse("--scenario", "scenarios/baseline.toml");
    let off_grid = run_and_parse("--scenario", "scenarios/off_grid_lithium.toml");
    let tiered = run_and_parse("--scenario", "scenarios/tiered_tariff.toml");

    assert_eq!(baseline.panels, 3);
    assert!(
        (baseline.total - 207_790.0).abs() < 0.01,
        "unexpected baseline total {:.2}",
        baseline.total
    );

    assert!(
        off_grid.panels > baseline.panels,
        "expected off-grid array to be larger: baseline={}, off_grid={}",
        baseline.panels,
        off_grid.panels
    );
    assert!(
        off_grid.total > baseline.total,
        "expected off-grid lithium quote to cost more: baseline={:.2}, off_grid={:.2}",
        baseline.total,
        off_grid.total
    );

    assert!(
        (tiered.payback_years - baseline.payback_years).abs() > 0.1,
        "expected tariff-priced payback to differ: baseline={:.1}, tiered={:.1}",
        baseline.payback_years,
        tiered.payback_years
    );
}

#[test]
fn presets_match_their_scenario_files() {
    let from_preset = run_and_parse("--preset", "baseline");
    let from_file = run_and_parse("--scenario", "scenarios/baseline.toml");
    assert_eq!(from_preset.panels, from_file.panels);
    assert!((from_preset.total - from_file.total).abs() < 1e-6);
}

#[test]
fn cli_flags_override_scenario_request() {
    let output = Command::new(env!("CARGO_BIN_EXE_solar-sizer"))
        .args(["--preset", "baseline", "--topology", "grid-tied", "--json"])
        .output()
        .expect("solar-sizer process should run");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert!(json["battery"].is_null());
    assert!(json["costs"]["lines"].get("battery").is_none());
}

#[test]
fn invalid_request_exits_non_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_solar-sizer"))
        .args(["--preset", "baseline", "--monthly-kwh=-10"])
        .output()
        .expect("solar-sizer process should run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("monthly_kwh"), "stderr: {stderr}");
}

#[test]
fn compare_rejects_csv_exports() {
    for mode in ["--compare", "--compare-batteries"] {
        for export in ["--breakdown-out", "--cashflow-out"] {
            let output = Command::new(env!("CARGO_BIN_EXE_solar-sizer"))
                .args(["--preset", "baseline", mode, export, "out.csv"])
                .output()
                .expect("solar-sizer process should run");
            assert!(!output.status.success(), "{mode} {export} was accepted");
            let stderr = String::from_utf8_lossy(&output.stderr);
            assert!(stderr.contains("cannot be used with"), "stderr: {stderr}");
        }
    }
}

#[test]
fn compare_batteries_prints_both_banks() {
    let output = Command::new(env!("CARGO_BIN_EXE_solar-sizer"))
        .args(["--preset", "baseline", "--compare-batteries"])
        .output()
        .expect("solar-sizer process should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Savings with lithium:"), "stdout: {stdout}");
    assert!(stdout.contains("150Ah"), "stdout: {stdout}");
}

#[test]
fn appliance_flags_replace_scenario_consumption() {
    let output = Command::new(env!("CARGO_BIN_EXE_solar-sizer"))
        .args([
            "--preset",
            "baseline",
            "--appliance",
            "fridge",
            "--appliance",
            "tv:2",
            "--appliance",
            "kettle:1:2000:0.2",
            "--json",
        ])
        .output()
        .expect("solar-sizer process should run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["profile"]["source"], "appliances");
    assert!(json["request"]["monthly_kwh"].is_null());
    let daily = json["profile"]["daily_consumption_kwh"].as_f64().unwrap();
    assert!((daily - 4.64).abs() < 1e-9);
}

fn run_and_parse(flag: &str, value: &str) -> Headline {
    let output = Command::new(env!("CARGO_BIN_EXE_solar-sizer"))
        .args([flag, value])
        .output()
        .expect("solar-sizer process should run");

    assert!(
        output.status.success(),
        "run failed for {flag} {value}: stderr={} ",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    Headline {
        panels: parse_metric(&stdout, "Array:", "×") as u32,
        total: parse_metric(&stdout, "Total:", ""),
        payback_years: parse_metric(&stdout, "Payback:", "years"),
    }
}

/// Number right after `label`, cut at `until` when given.
fn parse_metric(stdout: &str, label: &str, until: &str) -> f64 {
    let line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("missing line `{label}` in output: {stdout}"));

    let raw = line
        .split_once(':')
        .map(|(_, right)| right.trim())
        .unwrap_or_else(|| panic!("invalid format for line `{line}`"));

    let numeric = if until.is_empty() {
        raw
    } else {
        raw.split(until).next().unwrap_or(raw)
    }
    .trim();
    numeric
        .parse::<f64>()
        .unwrap_or_else(|_| panic!("failed parsing `{numeric}` from line `{line}`"))
}
