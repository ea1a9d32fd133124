use paydest_test_fixtures::fixtures;

fn main() {
    let fixtures = fixtures();
    println!(
        "{}",
        serde_json::to_string_pretty(fixtures).expect("serialize fixtures")
    );
}
