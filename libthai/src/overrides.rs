//! Built-in override rows.
//!
//! Hand-curated romanizations that must win over anything a bulk corpus
//! provides. They are ordinary corpus rows: known mappings are category
//! `override` with the maximal default priority, and proper-noun spellings
//! use their own category with a small boost. Loading them ahead of a file
//! corpus lets them take precedence on duplicate pairs.

use libthai_core::{Category, CorpusRow};
use once_cell::sync::Lazy;

/// Boost for hand-picked proper-noun spellings over the category default.
pub const PROPER_NOUN_BOOST: f64 = 2.5;

/// Romanization → Thai pairs users actually type.
pub const KNOWN_MAPPINGS: &[(&str, &str)] = &[
    // phrases
    ("kon", "คน"),
    ("narak", "น่ารัก"),
    ("kraikinkaikai", "ใครกินไข่ไก่"),
    ("kunmaechop", "คุณแม่ชอบ"),
    ("anakot", "อนาคต"),
    ("kunmae", "คุณแม่"),
    ("lokpaiprasat", "โรคปลายประสาท"),
    ("popainai", "พ่อไปไหน"),
    ("wainee", "วันนี้"),
    ("mainaloei", "ไม่น่าเลย"),
    ("taksin", "ทักษิณ"),
    ("mankoimainaerok", "มันก็ไม่แน่หรอก"),
    // greetings
    ("sawatdee", "สวัสดี"),
    ("khopkhun", "ขอบคุณ"),
    // very common words
    ("kan", "กัน"),
    ("tee", "ที่"),
    ("ja", "จะ"),
    ("pen", "เป็น"),
    ("hai", "ให้"),
    ("dai", "ได้"),
    ("mee", "มี"),
    ("tham", "ทำ"),
    ("hen", "เห็น"),
    ("pood", "พูด"),
    ("khao", "เขา"),
    ("rao", "เรา"),
    ("nee", "นี้"),
    ("nan", "นั้น"),
    ("yang", "ยัง"),
    ("laew", "แล้ว"),
    ("kap", "กับ"),
    ("duay", "ด้วย"),
    ("wa", "ว่า"),
    ("rue", "หรือ"),
    ("ko", "ก็"),
    ("tae", "แต่"),
    ("lae", "และ"),
    ("kong", "ของ"),
    ("chan", "ฉัน"),
    ("phom", "ผม"),
    ("khun", "คุณ"),
    ("ter", "เธอ"),
    ("man", "มัน"),
    // basic words
    ("chai", "ใช่"),
    ("mai", "ไม่"),
    ("rak", "รัก"),
    ("gin", "กิน"),
    ("kin", "กิน"),
    ("nam", "น้ำ"),
    ("kao", "ข้าว"),
    ("khao", "ข้าว"),
    ("ban", "บ้าน"),
    ("rot", "รถ"),
    ("pai", "ไป"),
    ("ma", "มา"),
    ("dee", "ดี"),
    ("suay", "สวย"),
    ("aroi", "อร่อย"),
    ("arai", "อะไร"),
    ("taorai", "เท่าไหร่"),
    ("yak", "อยาก"),
    ("deum", "ดื่ม"),
    ("norn", "นอน"),
    ("len", "เล่น"),
    ("rean", "เรียน"),
    ("tamngan", "ทำงาน"),
    // conversation
    ("wannee", "วันนี้"),
    ("penngaibang", "เป็นไงบ้าง"),
    ("pengaibang", "เป็นไงบ้าง"),
    ("penngai", "เป็นไง"),
    ("ngannakmai", "งานหนักไหม"),
    ("ngannak", "งานหนัก"),
    ("jor", "เจอ"),
    ("jur", "เจอ"),
    ("jer", "เจอ"),
    ("maha", "มาหา"),
    ("noydi", "หน่อยดิ"),
    ("noidi", "หน่อยดิ"),
    ("noi", "หน่อย"),
    ("di", "ดิ"),
    ("doo", "ดู"),
    ("du", "ดู"),
    ("meow", "เหมียว"),
    ("mew", "เหมียว"),
    ("maew", "แมว"),
    ("hong", "ห้อง"),
    ("hawng", "ห้อง"),
    ("pa", "ป่ะ"),
    ("paa", "ป่า"),
    ("bang", "บ้าง"),
    ("nak", "หนัก"),
    ("ngan", "งาน"),
    ("yakjor", "อยากเจอ"),
];

/// Proper nouns whose expected romanizations differ from a mechanical
/// transliteration.
pub const PROPER_NOUNS: &[(Category, &str, &[&str])] = &[
    (Category::Country, "อังกฤษ", &["angkrit", "angkrid", "england"]),
    (Category::Country, "รัสเซีย", &["russia", "radsia", "rassia"]),
    (Category::Country, "ญี่ปุ่น", &["japan", "yipun"]),
    (Category::Country, "จีน", &["china", "jeen"]),
    (Category::Country, "เกาหลี", &["korea", "kaoli"]),
    (Category::Country, "อเมริกา", &["america"]),
    (Category::Country, "อินเดีย", &["india"]),
    (Category::Country, "เยอรมนี", &["germany", "yeramani"]),
    (Category::Country, "ฝรั่งเศส", &["france", "farangset"]),
    (Category::Country, "ไทย", &["thai"]),
    (Category::Country, "เวียดนาม", &["vietnam"]),
    (Category::Country, "ลาว", &["laos"]),
    (Category::Country, "กัมพูชา", &["cambodia"]),
    (Category::Country, "เมียนมาร์", &["myanmar"]),
    (Category::Country, "สิงคโปร์", &["singapore"]),
    (Category::Country, "มาเลเซีย", &["malaysia"]),
    (Category::PersonName, "ทักษิณ", &["thaksin", "taksina"]),
    (Category::PersonName, "ยิ่งลักษณ์", &["yinglak", "yingluck"]),
    (Category::PersonName, "ประยุทธ์", &["prayut", "prayuth"]),
    (Category::PersonName, "อภิสิทธิ์", &["abhisit"]),
    (Category::Province, "เชียงใหม่", &["chiangmai", "chiang mai"]),
    (Category::Province, "เชียงราย", &["chiangrai", "chiang rai"]),
    (Category::Province, "กรุงเทพมหานคร", &["bangkok", "krungthep"]),
    (Category::Province, "ภูเก็ต", &["phuket"]),
    (Category::PersonName, "สมชาย", &["somchai"]),
    (Category::PersonName, "สมศักดิ์", &["somsak"]),
    (Category::PersonName, "ปราณี", &["pranee"]),
    (Category::PersonName, "สุดา", &["suda"]),
    (Category::PersonName, "วิชัย", &["wichai"]),
];

static BUILTIN_ROWS: Lazy<Vec<CorpusRow>> = Lazy::new(|| {
    let known = KNOWN_MAPPINGS
        .iter()
        .map(|(rom, thai)| CorpusRow::new(*rom, *thai, Category::Override));

    let proper = PROPER_NOUNS.iter().flat_map(|(category, thai, roms)| {
        roms.iter().map(move |rom| {
            CorpusRow::new(*rom, *thai, *category)
                .with_priority(category.default_priority() + PROPER_NOUN_BOOST)
        })
    });

    known.chain(proper).collect()
});

/// All built-in rows: known mappings first, then proper nouns.
pub fn builtin_rows() -> &'static [CorpusRow] {
    &BUILTIN_ROWS
}
