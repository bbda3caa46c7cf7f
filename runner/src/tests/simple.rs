use pretty_assertions::assert_eq;

use super::report;

static REFERENCE: &str = "4\n1, 10, 70\n2, 20, 40\n3, 40, 10\n4, 50, 40\n";

#[test]
fn reference_workload() {
    assert_eq!(
        report(REFERENCE, "10"),
        "Average wait time: 70.00\nAverage response time: 12.25\n"
    );
}

#[test]
fn shuffled_input_matches_reference() {
    let shuffled = "4\n2, 20, 40\n1, 10, 70\n4, 50, 40\n3, 40, 10\n";
    assert_eq!(report(shuffled, "10"), report(REFERENCE, "10"));
}

#[test]
fn staggered_arrivals() {
    let input = "4\n1, 10, 10\n2, 20, 10\n3, 30, 10\n4, 40, 10\n";
    assert_eq!(
        report(input, "10"),
        "Average wait time: 1.50\nAverage response time: 1.50\n"
    );
}

#[test]
fn arrival_during_context_switch() {
    let input = "4\n1, 10, 20\n2, 20, 30\n3, 30, 20\n4, 10, 10\n";
    assert_eq!(
        report(input, "10"),
        "Average wait time: 26.50\nAverage response time: 14.50\n"
    );
}

#[test]
fn thousand_simultaneous_processes() {
    let mut input = String::from("1000\n");
    for pid in 0..1000 {
        input.push_str(&format!("{pid}, 1, 1\n"));
    }
    assert_eq!(
        report(&input, "10"),
        "Average wait time: 999.00\nAverage response time: 999.00\n"
    );
}

#[test]
fn rerun_is_deterministic() {
    assert_eq!(report(REFERENCE, "10"), report(REFERENCE, "10"));
}

#[test]
fn averages_are_never_negative() {
    let simulation = super::simulate("3\n1, 0, 4\n2, 2, 6\n3, 3, 1\n", "3").unwrap();
    assert!(simulation.summary.average_wait >= 0.0);
    assert!(simulation.summary.average_response >= 0.0);
}
