// Agency and marketplace names that show up in photo credit lines. Entries
// are matched case-insensitively on word boundaries; lexical variants of the
// same brand are separate entries on purpose, and duplicates are tolerated.
pub const CREDIT_KEYWORDS: &[&str] = &[
    "getty",
    "reuters",
    "ap photo",
    "associated press",
    "imago",
    "panthermedia",
    "thinkstock",
    "bigstock",
    "icon sport",
    "clipdealer",
    "vector image",
    "shutterstock",
    "istock",
    "i stock",
    "alamy",
    "fotolia",
    "123rf",
    "deposit photos",
    "depositphotos",
    "depositphoto",
    "freepik",
    "freepik.com",
    "adobe stock",
    "alphaspirit",
    "alphaspirit.it",
    "alamy stock photo",
    "vector stock",
    "pixabay",
    "pexels",
    "unsplash",
    "pexel",
    "mostphotos",
    "stock.adobe.com",
    "garrett photography",
    "journey era",
    "profimedia",
    "fr.depositphotos.com",
    "fotolia.com",
    "www.shutterstock.com",
    "fr.freepik.com",
    "can stock photo",
    "canstockphoto",
    "123rf.com",
    // worldwide majors
    "getty images",
    "photodisc",
    "tony stone images",
    "allsport",
    "liaison agency",
    "istockphoto",
    "istockphoto.com",
    "adobe",
    "stocksy",
    "stocksy united",
    "eyeem",
    "ap images",
    "associated press images",
    "thomson reuters pictures",
    "afp",
    "agence france-presse",
    "epa",
    "epa images",
    "european pressphoto agency",
    "magnum",
    "magnum photos",
    "noor",
    "noor photo agency",
    "panos",
    "panos pictures",
    "vii",
    "vii photo agency",
    "contact press",
    "contact press images",
    "invision",
    "invision agency",
    "wireimage",
    "mediavast",
    // europe
    "sipa",
    "sipa press",
    "gamma",
    "gamma press",
    "rapho",
    "camera press",
    "rex features",
    "action press",
    "laif",
    "ansa",
    "ansa foto",
    "profimedia",
    "akg images",
    "keystone",
    "contrasto",
    "agence vu",
    "epa europe",
    "epa images",
    "epa photo",
    // america
    "upi",
    "upi photos",
    "black star",
    "contact press",
    "contact press images",
    "zuma",
    "zuma press",
    "everett collection",
    "polaris images",
    "ap photo",
    "ap images",
    "associated press",
    "getty entertainment",
    "invision agency",
    "mediavast",
    "corbis",
    "sygma",
    "bettmann archive",
    // asia
    "kyodo",
    "kyodo news",
    "nikkan sports",
    "jiji press",
    "yonhap",
    "yonhap news",
    "visual china group",
    "vcg",
    "china photo",
    "aflo",
    "aflo images",
    "xinhuanet",
    "xinhua",
    "nikkei photo",
    "epa asia",
];
