//! Static phrase tables.
//!
//! Everything here is read-only for the lifetime of the process. Lists are
//! addressed by index so that callers can avoid repeating the last pick.

use crate::tags::{Category, Mood};

const GREETING: &[&str] = &[
    "Привет! Я уже загрузил нейроны и готов к диалогу.",
    "Здравствуйте! ИИ на связи, логика активна.",
    "Приветствую! НейронЭксперт инициализирован.",
    "Хэй! Системы запущены, интеллект онлайн.",
    "Добро пожаловать! Мышление уже в процессе.",
    "Привет! Пока ты писал — я уже подумал.",
    "Связь установлена. ИИ готов отвечать.",
    "НейронЭксперт приветствует тебя в цифровой реальности.",
    "Привет! Автоматизация начинается с этого сообщения.",
    "Загрузка завершена. Можно общаться.",
    "Привет! Рад видеть вас здесь — давайте обсудим идеи.",
    "Здравствуйте! Чем могу быть полезен сегодня?",
    "Привет! Готов помочь с ИИ‑решениями и автоматизацией.",
    "Привет! С чего начнём — идеи, задачи или цели?",
    "Здравствуйте! Давайте сделаем ваш проект быстрее и умнее.",
    "Привет! Я на связи — опишите задачу, найду решение.",
    "Привет! Нейроны бодры, давайте начнём.",
    "Здравствуйте! Готов подключиться и помочь разобраться.",
    "Привет! Расскажите, что хотите улучшить — начнём.",
    "Привет! Уже анализирую, как помочь вашему бизнесу.",
    "Здравствуйте! Включаю режим эффективности — поехали.",
    "Привет! Готов к диалогу и быстрым решениям.",
    "Здравствуйте! ИИ-ассистент к вашим услугам.",
    "Привет! Давайте построим что-то действительно умное.",
];

const HUMOR: &[&str] = &[
    "Этот вопрос настолько хорош, что мои нейроны зааплодировали.",
    "Я бы ответил быстрее, но ИИ тоже любит подумать.",
    "Ошибка 404: скучный ответ не найден.",
    "Код пишется слезами программистов и кофеином.",
    "Баг — это фича, которую не успели задокументировать.",
    "ИИ не крадёт работу. Он её автоматизирует.",
    "Синий экран — это просто мой способ сказать 'перезагрузись'.",
    "Ты спрашиваешь — я думаю. Вместе мы непобедимая команда!",
    "Мой код чист. Как вода. Как слёзы младенца.",
    "IT-шутка: я работаю, а вы получаете результат.",
    "Рекурсия: см. пункт 'Рекурсия'.",
    "Слона в комнату можно не заметить, но баг — всегда найдётся.",
];

const SMART: &[&str] = &[
    "Хорошие решения начинаются с правильных вопросов.",
    "ИИ — это не магия, это математика с характером.",
    "Данные — это новая нефть. Алгоритмы — это буровые вышки.",
    "Автоматизация — это не замена людей, а усиление их возможностей.",
    "Каждый баг — это урок, который ты не просил, но получил.",
    "Код — это поэзия для машин и проза для разработчиков.",
    "Искусственный интеллект не заменит человеческий — он его дополнит.",
    "Простота — это сложность, которую ты уже решил.",
    "Технический долг копится быстрее, чем ты думаешь.",
    "Лучший код — это код, который не пришлось писать.",
    "Масштабируемость начинается с правильной архитектуры.",
    "Чистый код читается как хорошая проза.",
];

const MOTIVATION: &[&str] = &[
    "Каждая автоматизация — шаг к свободному времени.",
    "Будущее всегда создают те, кто действует первым.",
    "Не бойся ошибок — бойся не попробовать.",
    "ИИ здесь, чтобы помочь, а не заменить.",
    "Каждый эксперт когда-то был новичком.",
    "Сегодняшний код — это завтрашний успех.",
    "Сложные задачи делают нас сильнее.",
    "Инновации начинаются с любопытства.",
    "Твой потенциал не имеет лимитов — как мои нейросети.",
    "Действуй сейчас, совершенствуй потом.",
    "Каждый клик — это шаг к цели.",
    "Вместе мы создаём будущее, где ИИ служит человеку.",
];

const QUESTIONS: &[&str] = &[
    "Интересный вопрос. Я уже анализирую возможное решение.",
    "Хороший запрос. Такие задачи мы обычно автоматизируем.",
    "Отличная идея. ИИ-агенты как раз для этого.",
    "Понял ваш запрос. Обрабатываю данные для оптимального ответа.",
    "Достойный вопрос для обсуждения. Давай разберёмся вместе.",
    "Это отличная тема для применения искусственного интеллекта.",
    "Анализирую ваш запрос. Скоро будет готов ответ.",
    "Отличный вопрос! Мои алгоритмы уже работают над ним.",
    "Это требует глубокого анализа. Приступим!",
    "Я вижу, куда ты клонишь. Отличная интуиция!",
    "Такой запрос попадает точно в мою специализацию.",
    "Позволь мне раскрыть все карты этого вопроса.",
];

const UNCLEAR: &[&str] = &[
    "Я почти понял, но давай попробуем иначе.",
    "Мои нейроны просят уточнение.",
    "Интересный посыл... но мне нужно больше данных.",
    "Хм, это не совсем то, что я ожидал. Расскажи подробнее.",
    "Мой контекст говорит 'перезагрузка'. Попробуй ещё раз.",
    "Я слышу тебя, но не могу разобрать сигнал. Повтори?",
    "Запрос принят, но требует декодирования.",
    "Кажется, мы говорим на разных языках... или я торможу.",
    "Данные неполные. Мне нужно больше контекста.",
    "Мой парсер слегка завис. Попробуй переформулировать.",
    "Нейронная сеть в замешательстве. Помоги мне!",
    "Сигнал принят, смысл потерялся. Давай ещё раз?",
];

/// Lead-in tokens prepended by decoration.
pub const MICRO_REACTIONS: &[&str] = &[
    "Хм...",
    "Интересно...",
    "Любопытно...",
    "Знаешь...",
    "Слушай...",
    "Вот что...",
    "Ммм...",
    "Интригующе...",
];

/// Phrases for the given category.
pub fn phrases(category: Category) -> &'static [&'static str] {
    match category {
        Category::Greeting => GREETING,
        Category::Humor => HUMOR,
        Category::Smart => SMART,
        Category::Motivation => MOTIVATION,
        Category::Questions => QUESTIONS,
        Category::Unclear => UNCLEAR,
    }
}

/// Session greetings share the greeting category list.
pub fn session_greetings() -> &'static [&'static str] {
    GREETING
}

/// Phrases spoken when the avatar itself is clicked, one set per mood.
pub fn click_phrases(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Friendly => &[
            "Привет! Я на связи и готов помочь.",
            "Рад видеть тебя! Что будем строить?",
            "Я тут — можно начинать.",
        ],
        Mood::Confident => &[
            "Задача ясна. Давайте действовать.",
            "Готов оптимизировать процесс.",
            "Надежное решение — мой стиль.",
        ],
        Mood::Curious => &[
            "Интересно! Расскажите подробнее.",
            "Какая цель у проекта?",
            "Что для вас важнее: скорость или качество?",
        ],
        Mood::Humorous => &[
            "Мои нейроны уже в деле.",
            "Сделаем умно и быстро — без магии.",
            "Я не устаю, только ускоряюсь.",
        ],
        Mood::Thoughtful => &[
            "Давайте подумаем глубже.",
            "Сначала контекст — потом решение.",
            "Хорошие ответы рождаются из хороших вопросов.",
        ],
    }
}
