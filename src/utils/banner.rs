/// Startup banner printed before any worker spawns.
pub fn display_banner() {
    println!(
        r#"
        .-------------------------------------.
        |          KLDO Testnet Miner         |
        '-------------------------------------'

        Simulated mining against the testnet balance API
        Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
