//! Algerian administrative regions.
//!
//! A static table of the 58 wilayas and a commune list covering every wilaya
//! seat plus the main livestock-market towns. Commune ids are stable within
//! this table; orders store both the id and the name so a renamed commune
//! never rewrites history.

use serde::Serialize;

/// A wilaya (province).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wilaya {
    /// Two-digit code, `"01"` to `"58"`.
    pub code: &'static str,
    pub name: &'static str,
    pub name_ascii: &'static str,
}

/// A commune (municipality) inside a wilaya.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Commune {
    pub id: i32,
    pub name: &'static str,
    pub name_ascii: &'static str,
    pub wilaya_code: &'static str,
}

const fn wilaya(code: &'static str, name: &'static str, name_ascii: &'static str) -> Wilaya {
    Wilaya {
        code,
        name,
        name_ascii,
    }
}

const fn commune(
    id: i32,
    name: &'static str,
    name_ascii: &'static str,
    wilaya_code: &'static str,
) -> Commune {
    Commune {
        id,
        name,
        name_ascii,
        wilaya_code,
    }
}

static WILAYAS: [Wilaya; 58] = [
    wilaya("01", "أدرار", "Adrar"),
    wilaya("02", "الشلف", "Chlef"),
    wilaya("03", "الأغواط", "Laghouat"),
    wilaya("04", "أم البواقي", "Oum El Bouaghi"),
    wilaya("05", "باتنة", "Batna"),
    wilaya("06", "بجاية", "Bejaia"),
    wilaya("07", "بسكرة", "Biskra"),
    wilaya("08", "بشار", "Bechar"),
    wilaya("09", "البليدة", "Blida"),
    wilaya("10", "البويرة", "Bouira"),
    wilaya("11", "تمنراست", "Tamanrasset"),
    wilaya("12", "تبسة", "Tebessa"),
    wilaya("13", "تلمسان", "Tlemcen"),
    wilaya("14", "تيارت", "Tiaret"),
    wilaya("15", "تيزي وزو", "Tizi Ouzou"),
    wilaya("16", "الجزائر", "Alger"),
    wilaya("17", "الجلفة", "Djelfa"),
    wilaya("18", "جيجل", "Jijel"),
    wilaya("19", "سطيف", "Setif"),
    wilaya("20", "سعيدة", "Saida"),
    wilaya("21", "سكيكدة", "Skikda"),
    wilaya("22", "سيدي بلعباس", "Sidi Bel Abbes"),
    wilaya("23", "عنابة", "Annaba"),
    wilaya("24", "قالمة", "Guelma"),
    wilaya("25", "قسنطينة", "Constantine"),
    wilaya("26", "المدية", "Medea"),
    wilaya("27", "مستغانم", "Mostaganem"),
    wilaya("28", "المسيلة", "M'Sila"),
    wilaya("29", "معسكر", "Mascara"),
    wilaya("30", "ورقلة", "Ouargla"),
    wilaya("31", "وهران", "Oran"),
    wilaya("32", "البيض", "El Bayadh"),
    wilaya("33", "إليزي", "Illizi"),
    wilaya("34", "برج بوعريريج", "Bordj Bou Arreridj"),
    wilaya("35", "بومرداس", "Boumerdes"),
    wilaya("36", "الطارف", "El Tarf"),
    wilaya("37", "تندوف", "Tindouf"),
    wilaya("38", "تيسمسيلت", "Tissemsilt"),
    wilaya("39", "الوادي", "El Oued"),
    wilaya("40", "خنشلة", "Khenchela"),
    wilaya("41", "سوق أهراس", "Souk Ahras"),
    wilaya("42", "تيبازة", "Tipaza"),
    wilaya("43", "ميلة", "Mila"),
    wilaya("44", "عين الدفلى", "Ain Defla"),
    wilaya("45", "النعامة", "Naama"),
    wilaya("46", "عين تموشنت", "Ain Temouchent"),
    wilaya("47", "غرداية", "Ghardaia"),
    wilaya("48", "غليزان", "Relizane"),
    wilaya("49", "تيميمون", "Timimoun"),
    wilaya("50", "برج باجي مختار", "Bordj Badji Mokhtar"),
    wilaya("51", "أولاد جلال", "Ouled Djellal"),
    wilaya("52", "بني عباس", "Beni Abbes"),
    wilaya("53", "عين صالح", "In Salah"),
    wilaya("54", "عين قزام", "In Guezzam"),
    wilaya("55", "تقرت", "Touggourt"),
    wilaya("56", "جانت", "Djanet"),
    wilaya("57", "المغير", "El M'Ghair"),
    wilaya("58", "المنيعة", "El Meniaa"),
];

static COMMUNES: [Commune; 82] = [
    commune(1, "أدرار", "Adrar", "01"),
    commune(2, "الشلف", "Chlef", "02"),
    commune(3, "الأغواط", "Laghouat", "03"),
    commune(4, "آفلو", "Aflou", "03"),
    commune(5, "أم البواقي", "Oum El Bouaghi", "04"),
    commune(6, "باتنة", "Batna", "05"),
    commune(7, "بريكة", "Barika", "05"),
    commune(8, "بجاية", "Bejaia", "06"),
    commune(9, "بسكرة", "Biskra", "07"),
    commune(10, "بشار", "Bechar", "08"),
    commune(11, "البليدة", "Blida", "09"),
    commune(12, "بوفاريك", "Boufarik", "09"),
    commune(13, "الأربعاء", "Larbaa", "09"),
    commune(14, "البويرة", "Bouira", "10"),
    commune(15, "تمنراست", "Tamanrasset", "11"),
    commune(16, "تبسة", "Tebessa", "12"),
    commune(17, "تلمسان", "Tlemcen", "13"),
    commune(18, "تيارت", "Tiaret", "14"),
    commune(19, "السوقر", "Sougueur", "14"),
    commune(20, "فرندة", "Frenda", "14"),
    commune(21, "تيزي وزو", "Tizi Ouzou", "15"),
    commune(22, "الجزائر الوسطى", "Alger Centre", "16"),
    commune(23, "باب الوادي", "Bab El Oued", "16"),
    commune(24, "القبة", "Kouba", "16"),
    commune(25, "بئر مراد رايس", "Bir Mourad Rais", "16"),
    commune(26, "الحراش", "El Harrach", "16"),
    commune(27, "الدار البيضاء", "Dar El Beida", "16"),
    commune(28, "الجلفة", "Djelfa", "17"),
    commune(29, "عين وسارة", "Ain Oussera", "17"),
    commune(30, "حاسي بحبح", "Hassi Bahbah", "17"),
    commune(31, "مسعد", "Messaad", "17"),
    commune(32, "جيجل", "Jijel", "18"),
    commune(33, "سطيف", "Setif", "19"),
    commune(34, "العلمة", "El Eulma", "19"),
    commune(35, "عين ولمان", "Ain Oulmene", "19"),
    commune(36, "سعيدة", "Saida", "20"),
    commune(37, "سكيكدة", "Skikda", "21"),
    commune(38, "سيدي بلعباس", "Sidi Bel Abbes", "22"),
    commune(39, "عنابة", "Annaba", "23"),
    commune(40, "قالمة", "Guelma", "24"),
    commune(41, "قسنطينة", "Constantine", "25"),
    commune(42, "الخروب", "El Khroub", "25"),
    commune(43, "حامة بوزيان", "Hamma Bouziane", "25"),
    commune(44, "المدية", "Medea", "26"),
    commune(45, "مستغانم", "Mostaganem", "27"),
    commune(46, "المسيلة", "M'Sila", "28"),
    commune(47, "بوسعادة", "Bou Saada", "28"),
    commune(48, "معسكر", "Mascara", "29"),
    commune(49, "ورقلة", "Ouargla", "30"),
    commune(50, "وهران", "Oran", "31"),
    commune(51, "السانية", "Es Senia", "31"),
    commune(52, "بئر الجير", "Bir El Djir", "31"),
    commune(53, "أرزيو", "Arzew", "31"),
    commune(54, "البيض", "El Bayadh", "32"),
    commune(55, "بوقطب", "Bougtob", "32"),
    commune(56, "إليزي", "Illizi", "33"),
    commune(57, "برج بوعريريج", "Bordj Bou Arreridj", "34"),
    commune(58, "بومرداس", "Boumerdes", "35"),
    commune(59, "الطارف", "El Tarf", "36"),
    commune(60, "تندوف", "Tindouf", "37"),
    commune(61, "تيسمسيلت", "Tissemsilt", "38"),
    commune(62, "الوادي", "El Oued", "39"),
    commune(63, "خنشلة", "Khenchela", "40"),
    commune(64, "سوق أهراس", "Souk Ahras", "41"),
    commune(65, "تيبازة", "Tipaza", "42"),
    commune(66, "ميلة", "Mila", "43"),
    commune(67, "عين الدفلى", "Ain Defla", "44"),
    commune(68, "النعامة", "Naama", "45"),
    commune(69, "المشرية", "Mecheria", "45"),
    commune(70, "عين تموشنت", "Ain Temouchent", "46"),
    commune(71, "غرداية", "Ghardaia", "47"),
    commune(72, "غليزان", "Relizane", "48"),
    commune(73, "تيميمون", "Timimoun", "49"),
    commune(74, "برج باجي مختار", "Bordj Badji Mokhtar", "50"),
    commune(75, "أولاد جلال", "Ouled Djellal", "51"),
    commune(76, "بني عباس", "Beni Abbes", "52"),
    commune(77, "عين صالح", "In Salah", "53"),
    commune(78, "عين قزام", "In Guezzam", "54"),
    commune(79, "تقرت", "Touggourt", "55"),
    commune(80, "جانت", "Djanet", "56"),
    commune(81, "المغير", "El M'Ghair", "57"),
    commune(82, "المنيعة", "El Meniaa", "58"),
];

/// Normalize `"1"`, `"01"` and `" 01 "` to the table's two-digit form.
fn normalize_code(code: &str) -> Option<String> {
    let n: u8 = code.trim().parse().ok()?;
    Some(format!("{n:02}"))
}

/// All wilayas, ordered by numeric code.
#[must_use]
pub fn get_wilayas() -> Vec<Wilaya> {
    let mut wilayas = WILAYAS.to_vec();
    wilayas.sort_by_key(|w| w.code.parse::<u8>().unwrap_or(u8::MAX));
    wilayas
}

/// Look up a wilaya by code. Leading zeros are optional.
#[must_use]
pub fn get_wilaya_by_code(code: &str) -> Option<Wilaya> {
    let code = normalize_code(code)?;
    WILAYAS.iter().find(|w| w.code == code).copied()
}

/// Communes of a wilaya, ordered by Arabic name. Empty for an unknown code.
#[must_use]
pub fn get_communes_by_wilaya(code: &str) -> Vec<Commune> {
    let Some(code) = normalize_code(code) else {
        return Vec::new();
    };
    let mut communes: Vec<Commune> = COMMUNES
        .iter()
        .filter(|c| c.wilaya_code == code)
        .copied()
        .collect();
    communes.sort_by(|a, b| a.name.cmp(b.name));
    communes
}

/// Look up a commune by id.
#[must_use]
pub fn get_commune_by_id(id: i32) -> Option<Commune> {
    COMMUNES.iter().find(|c| c.id == id).copied()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_fifty_eight_wilayas_in_code_order() {
        let wilayas = get_wilayas();
        assert_eq!(wilayas.len(), 58);
        assert_eq!(wilayas[0].code, "01");
        assert_eq!(wilayas[57].code, "58");
        assert!(wilayas.windows(2).all(|w| w[0].code < w[1].code));
    }

    #[test]
    fn test_wilaya_lookup_tolerates_missing_zero() {
        assert_eq!(get_wilaya_by_code("16").unwrap().name, "الجزائر");
        assert_eq!(get_wilaya_by_code("9").unwrap().name_ascii, "Blida");
        assert!(get_wilaya_by_code("59").is_none());
        assert!(get_wilaya_by_code("abc").is_none());
    }

    #[test]
    fn test_every_wilaya_has_a_commune() {
        for w in get_wilayas() {
            assert!(!get_communes_by_wilaya(w.code).is_empty(), "{}", w.code);
        }
    }

    #[test]
    fn test_communes_sorted_by_name() {
        let communes = get_communes_by_wilaya("16");
        assert!(communes.len() > 1);
        assert!(communes.windows(2).all(|c| c[0].name <= c[1].name));
        assert!(communes.iter().all(|c| c.wilaya_code == "16"));
    }

    #[test]
    fn test_commune_ids_unique_and_resolvable() {
        let ids: HashSet<i32> = COMMUNES.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), COMMUNES.len());
        let commune = get_commune_by_id(COMMUNES[0].id).unwrap();
        assert_eq!(commune.wilaya_code, "01");
        assert!(get_commune_by_id(0).is_none());
    }

    #[test]
    fn test_unknown_wilaya_has_no_communes() {
        assert!(get_communes_by_wilaya("77").is_empty());
    }
}
