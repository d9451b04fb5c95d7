//! Branded welcome embed.

use nexus_core::Brand;
use nexus_interface::Embed;

/// Welcome embed for a guild, titled with the brand name or the guild name.
///
/// ```
/// use nexus_automation::welcome_embed;
/// use nexus_core::Brand;
///
/// let embed = welcome_embed(&Brand::default(), "My Server", 0);
/// assert_eq!(embed.title.as_deref(), Some("Welcome to NEXUS Community!"));
/// assert_eq!(embed.color, Some(0x00A3FF));
/// ```
pub fn welcome_embed(brand: &Brand, guild_name: &str, now_ms: i64) -> Embed {
    let name = if brand.server_name.is_empty() {
        guild_name
    } else {
        brand.server_name.as_str()
    };

    let mut embed = Embed::default()
        .title(format!("Welcome to {name}!"))
        .description(
            "Read the **rules**, grab your **roles** with the buttons in #welcome and say **Hi** in #chat.",
        )
        .color(brand.color_value())
        .timestamp_ms(now_ms);
    if !brand.banner_url.is_empty() {
        embed = embed.image_url(brand.banner_url.clone());
    }
    if !brand.logo_url.is_empty() {
        embed = embed.thumbnail_url(brand.logo_url.clone());
    }
    embed
}
