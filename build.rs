use dotenvy::dotenv;
use std::env::var;

fn main() {
    dotenv().ok();

    println!("cargo:rerun-if-env-changed=DISCORD_TOKEN");
    println!("cargo:rerun-if-env-changed=DISCORD_TEST_CHANNEL");

    if var("DISCORD_TOKEN").is_err() || var("DISCORD_TEST_CHANNEL").is_err() {
        println!("cargo:rustc-cfg=no_live_api");
    }
}
