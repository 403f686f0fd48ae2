//! Built-in catalog data: a ranking of ramen shop branches.
//!
//! The first item is the anchor and is the only occupant of the pinned `EX` tier.

/// `(id, color, pinned_only)` in rank order.
pub(crate) const TIERS: &[(&str, &str, bool)] = &[
    ("EX", "#FF1493", true),
    ("SSS", "#FFD700", false),
    ("SS", "#C0C0C0", false),
    ("S", "#FF6B6B", false),
    ("A+", "#FF8C00", false),
    ("A", "#45B7D1", false),
    ("A-", "#96CEB4", false),
    ("B", "#FFEAA7", false),
    ("C", "#DDA0DD", false),
];

/// `(name, seed tier)`; ids are assigned from 1 in this order.
pub(crate) const ITEMS: &[(&str, &str)] = &[
    ("Mita", "EX"),
    ("Meguro", "A"),
    ("Sengawa", "B"),
    ("Kabukicho", "C"),
    ("Shinagawa", "A+"),
    ("Otakibashi", "B"),
    ("Kannana Shindaita", "B"),
    ("Yaen Kaido", "SS"),
    ("Ikebukuro", "C"),
    ("Kameido", "S"),
    ("Keikyu Kawasaki", "A"),
    ("Fuchu", "A"),
    ("Matsudo", "SS"),
    ("Mejirodai", "A"),
    ("Ogikubo", "A"),
    ("Kaminoge", "A"),
    ("Keisei Okubo", "A"),
    ("Kannana Ichinoe", "A+"),
    ("Sagami Ono", "A+"),
    ("Yokohama Kannai", "SSS"),
    ("Kanda Jimbocho", "A+"),
    ("Koiwa", "SS"),
    ("Hibarigaoka", "SS"),
    ("Tochigi Kaido", "A"),
    ("Tachikawa", "A-"),
    ("Senju Ohashi", "A"),
    ("Shonan Fujisawa", "S"),
    ("Nishidai", "B"),
    ("Nakayama", "A+"),
    ("Sendai", "A+"),
    ("Sapporo", "A-"),
    ("Aizu Wakamatsu", "A-"),
    ("Niigata", "A"),
    ("Kawagoe", "A+"),
    ("Kyoto", "A"),
    ("Koshigaya", "B"),
    ("Maebashi Chiyoda", "A"),
    ("Chiba", "S"),
    ("Omiya Koen", "A"),
    ("Hitachinaka", "S"),
    ("Hitotsubashi Gakuen", "A+"),
    ("Kashiwa", "B"),
    ("Ikuta", "A-"),
    ("Asakura Kaido", "S"),
];
