use shadow_rs::ShadowBuilder;

fn main() {
    // Build metadata consumed by the CLI version string.
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
