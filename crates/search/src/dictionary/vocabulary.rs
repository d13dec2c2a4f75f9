//! Bundled kitchen vocabulary: surface form and hiragana reading.
//!
//! Compounds with an irregular reading (豚汁, 湯豆腐) need their own entry;
//! regular compounds fall out of longest-match over the single words.

pub(super) const VOCABULARY: &[(&str, &str)] = &[
    // vegetables
    ("玉ねぎ", "たまねぎ"),
    ("玉葱", "たまねぎ"),
    ("人参", "にんじん"),
    ("大根", "だいこん"),
    ("白菜", "はくさい"),
    ("胡瓜", "きゅうり"),
    ("茄子", "なす"),
    ("生姜", "しょうが"),
    ("大蒜", "にんにく"),
    ("葱", "ねぎ"),
    ("長葱", "ながねぎ"),
    ("長ねぎ", "ながねぎ"),
    ("青葱", "あおねぎ"),
    ("椎茸", "しいたけ"),
    ("舞茸", "まいたけ"),
    ("占地", "しめじ"),
    ("松茸", "まつたけ"),
    ("牛蒡", "ごぼう"),
    ("蓮根", "れんこん"),
    ("南瓜", "かぼちゃ"),
    ("馬鈴薯", "じゃがいも"),
    ("芋", "いも"),
    ("里芋", "さといも"),
    ("薩摩芋", "さつまいも"),
    ("長芋", "ながいも"),
    ("小松菜", "こまつな"),
    ("法蓮草", "ほうれんそう"),
    ("菠薐草", "ほうれんそう"),
    ("水菜", "みずな"),
    ("春菊", "しゅんぎく"),
    ("韮", "にら"),
    ("筍", "たけのこ"),
    ("竹の子", "たけのこ"),
    ("枝豆", "えだまめ"),
    ("大豆", "だいず"),
    ("小豆", "あずき"),
    ("豆", "まめ"),
    ("豆苗", "とうみょう"),
    ("蕪", "かぶ"),
    ("三つ葉", "みつば"),
    ("紫蘇", "しそ"),
    ("大葉", "おおば"),
    ("茗荷", "みょうが"),
    ("玉蜀黍", "とうもろこし"),
    ("唐辛子", "とうがらし"),
    ("貝割れ", "かいわれ"),
    ("野菜", "やさい"),
    // fruit
    ("果物", "くだもの"),
    ("林檎", "りんご"),
    ("苺", "いちご"),
    ("檸檬", "れもん"),
    ("柚子", "ゆず"),
    ("蜜柑", "みかん"),
    ("梅干し", "うめぼし"),
    ("梅", "うめ"),
    // meat and eggs
    ("肉", "にく"),
    ("鶏", "とり"),
    ("鶏肉", "とりにく"),
    ("豚", "ぶた"),
    ("豚肉", "ぶたにく"),
    ("牛", "ぎゅう"),
    ("牛肉", "ぎゅうにく"),
    ("挽肉", "ひきにく"),
    ("挽き肉", "ひきにく"),
    ("合挽き", "あいびき"),
    ("胸肉", "むねにく"),
    ("手羽先", "てばさき"),
    ("手羽元", "てばもと"),
    ("卵", "たまご"),
    ("玉子", "たまご"),
    // seafood
    ("魚", "さかな"),
    ("鮭", "さけ"),
    ("鯖", "さば"),
    ("鰯", "いわし"),
    ("鯵", "あじ"),
    ("鰹", "かつお"),
    ("鮪", "まぐろ"),
    ("鱈", "たら"),
    ("鰤", "ぶり"),
    ("海老", "えび"),
    ("烏賊", "いか"),
    ("蛸", "たこ"),
    ("浅蜊", "あさり"),
    ("牡蠣", "かき"),
    ("帆立", "ほたて"),
    ("海苔", "のり"),
    ("昆布", "こんぶ"),
    ("若布", "わかめ"),
    ("鹿尾菜", "ひじき"),
    // soy and processed
    ("豆腐", "とうふ"),
    ("油揚げ", "あぶらあげ"),
    ("厚揚げ", "あつあげ"),
    ("納豆", "なっとう"),
    ("蒟蒻", "こんにゃく"),
    ("竹輪", "ちくわ"),
    ("蒲鉾", "かまぼこ"),
    // seasonings
    ("醤油", "しょうゆ"),
    ("砂糖", "さとう"),
    ("塩", "しお"),
    ("胡椒", "こしょう"),
    ("味噌", "みそ"),
    ("酢", "す"),
    ("酒", "さけ"),
    ("料理酒", "りょうりしゅ"),
    ("味醂", "みりん"),
    ("油", "あぶら"),
    ("胡麻", "ごま"),
    ("胡麻油", "ごまあぶら"),
    ("片栗粉", "かたくりこ"),
    ("小麦粉", "こむぎこ"),
    ("薄力粉", "はくりきこ"),
    ("強力粉", "きょうりきこ"),
    ("粉", "こ"),
    ("出汁", "だし"),
    ("鰹節", "かつおぶし"),
    ("蜂蜜", "はちみつ"),
    ("山葵", "わさび"),
    ("辛子", "からし"),
    ("芥子", "からし"),
    ("七味", "しちみ"),
    ("生", "なま"),
    ("牛乳", "ぎゅうにゅう"),
    // staples
    ("米", "こめ"),
    ("ご飯", "ごはん"),
    ("御飯", "ごはん"),
    ("飯", "めし"),
    ("餅", "もち"),
    ("食パン", "しょくぱん"),
    ("麺", "めん"),
    ("饂飩", "うどん"),
    ("蕎麦", "そば"),
    ("素麺", "そうめん"),
    ("丼", "どん"),
    // dishes and techniques
    ("汁", "しる"),
    ("味噌汁", "みそしる"),
    ("豚汁", "とんじる"),
    ("唐揚げ", "からあげ"),
    ("天ぷら", "てんぷら"),
    ("天麩羅", "てんぷら"),
    ("焼き", "やき"),
    ("炒め", "いため"),
    ("煮物", "にもの"),
    ("揚げ", "あげ"),
    ("親子丼", "おやこどん"),
    ("牛丼", "ぎゅうどん"),
    ("餃子", "ぎょうざ"),
    ("焼売", "しゅうまい"),
    ("炒飯", "チャーハン"),
    ("茶碗蒸し", "ちゃわんむし"),
    ("目玉焼き", "めだまやき"),
    ("好み焼き", "このみやき"),
    ("鍋", "なべ"),
    ("寿司", "すし"),
    ("刺身", "さしみ"),
    ("漬物", "つけもの"),
    ("浅漬け", "あさづけ"),
    ("冷奴", "ひややっこ"),
    ("湯豆腐", "ゆどうふ"),
    ("麻婆豆腐", "マーボーどうふ"),
];
