use clap::ValueEnum;
use colored::Colorize;
use qb_client::CharacterApi;
use qb_core::NewCharacter;

use super::Context;

/// Ready-made portraits offered when creating a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Portrait {
    /// Glasses and a grin.
    Nerd,
    /// Winking.
    Piscadinha,
    /// Happy.
    Feliz,
    /// In love.
    Amoroso,
    /// Sleepy.
    Soninho,
}

impl Portrait {
    /// Image URL stored on the character.
    pub fn url(self) -> &'static str {
        match self {
            Portrait::Nerd => "https://pixabay.com/get/gd8fbd5c68f9bbd51292ec00e8fb10fca0adcd647e2b84aec6d94ee5f54c5a1d7ecc92da54ecb6e07a5b29b59b83343235b686e8f3f15c05f2168d8b4c0c2920b97f8827baa822decb7a9e2f928636d60_640.png",
            Portrait::Piscadinha => "https://pixabay.com/get/gff9ed63965f94b4ee2c9e293fcc901553cf25aca2ba07b420979f0bbc7de24021c1b2ff09e381c997b64c2b5539e257610c281d05bc685111745e7a6859cd0f19b7ff0d6fb075771f1e144d04a5fa62b_640.png",
            Portrait::Feliz => "https://pixabay.com/get/gb32ff5e9d99a1721a550f21e75f1454f79e9662a223f8a800a0bcd09c09cc6bbff72d6041f0b0ec0a82e206914cb2c4ed7c2c9664741f458411c519de3e97e0fbdacf002f38852a73f9e81a1fef5a547_640.png",
            Portrait::Amoroso => "https://pixabay.com/get/ge9f1c4483a98deff9430c9f0956ff841cdae6876fc53cfbc08c3e03f91ff1143ad9775e959fdae20e43d7d17628420c19a118851bc44bc4e9e93f655820f433b81f3c8f6ea16618ba50bff85ee3ec324_640.png",
            Portrait::Soninho => "https://pixabay.com/get/g22f23376afeed7f93802e2883b29470aa2a703410a3d06ea47e31033d1d88a4605a3208881e956523b41d65292baa7431ef6a31f16c2d76fabea04023dd5f1dcc49789a1d83a7d57744e38ee697d3da8_640.png",
        }
    }
}

/// Portrait URL from `--image` or `--portrait`; clap keeps them exclusive.
fn image_url(image: Option<&str>, portrait: Option<Portrait>) -> Option<&str> {
    image.or(portrait.map(Portrait::url))
}

pub async fn run(
    ctx: &Context,
    name: &str,
    image: Option<&str>,
    portrait: Option<Portrait>,
) -> Result<(), String> {
    let claims = ctx.store.claims().map_err(|e| e.to_string())?;

    let mut new = NewCharacter::new(name.trim(), claims.id);
    if let Some(url) = image_url(image, portrait) {
        new = new.with_image(url);
    }
    new.validate().map_err(|e| e.to_string())?;

    let character = ctx
        .api()?
        .create_character(&new)
        .await
        .map_err(|e| format!("cannot create character: {e}"))?;

    println!(
        "  Created {} (id {}) with {} attribute points to spend.",
        character.name.bold(),
        character.id,
        character.available_attribute_points
    );
    println!("  Select it with: qb select {}", character.id);
    Ok(())
}
