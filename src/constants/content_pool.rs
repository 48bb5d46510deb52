pub struct TopicSentences {
    pub topic: &'static str,
    pub level: &'static str,
    pub sentences: &'static [&'static str],
}

pub struct CuratedQuestion {
    pub question: &'static str,
    pub options: [&'static str; 4],
    pub answer: usize,
    pub explain: &'static str,
}

pub struct TopicQuestions {
    pub topic: &'static str,
    pub level: &'static str,
    pub questions: &'static [CuratedQuestion],
}

pub const NO_DATA_SENTINEL: &str = "(Không có dữ liệu cho chủ đề/mức độ này)";
pub const POOL_EXHAUSTED_SENTINEL: &str = "(Hết câu luyện tập)";

pub const PRACTICE_SENTENCES: &[TopicSentences] = &[
    TopicSentences {
        topic: "travel",
        level: "easy",
        sentences: &[
            "Tôi muốn đặt một phòng khách sạn.",
            "Bạn có thể chỉ đường đến sân bay không?",
            "Tôi thích đi du lịch bằng tàu hỏa.",
        ],
    },
    TopicSentences {
        topic: "travel",
        level: "medium",
        sentences: &[
            "Tôi đã từng bị lạc khi đi du lịch ở nước ngoài.",
            "Bạn có thể giới thiệu một nhà hàng địa phương nổi tiếng không?",
            "Tôi muốn trải nghiệm văn hóa bản địa khi đi du lịch.",
        ],
    },
    TopicSentences {
        topic: "travel",
        level: "hard",
        sentences: &[
            "Việc chuẩn bị hành lý kỹ càng giúp chuyến đi suôn sẻ hơn.",
            "Tôi muốn tìm hiểu về lịch sử và phong tục của nơi tôi đến.",
            "Bạn nghĩ điều gì là khó khăn nhất khi du lịch nước ngoài?",
        ],
    },
    TopicSentences {
        topic: "school",
        level: "easy",
        sentences: &[
            "Tôi đi học bằng xe đạp.",
            "Môn học yêu thích của tôi là tiếng Anh.",
            "Tôi có nhiều bạn ở trường.",
        ],
    },
    TopicSentences {
        topic: "school",
        level: "medium",
        sentences: &[
            "Tôi thường làm bài tập về nhà vào buổi tối.",
            "Giáo viên của tôi rất thân thiện và nhiệt tình.",
            "Tôi muốn tham gia câu lạc bộ tiếng Anh.",
        ],
    },
    TopicSentences {
        topic: "school",
        level: "hard",
        sentences: &[
            "Việc học nhóm giúp tôi hiểu bài nhanh hơn.",
            "Tôi nghĩ rằng kỹ năng thuyết trình rất quan trọng trong học tập.",
            "Bạn có thể chia sẻ kinh nghiệm học tập hiệu quả không?",
        ],
    },
    TopicSentences {
        topic: "food",
        level: "easy",
        sentences: &[
            "Tôi thích ăn phở vào buổi sáng.",
            "Mẹ tôi nấu ăn rất ngon.",
            "Bạn muốn uống trà hay cà phê?",
        ],
    },
    TopicSentences {
        topic: "food",
        level: "medium",
        sentences: &[
            "Tôi đang cố gắng ăn nhiều rau hơn mỗi ngày.",
            "Nhà hàng này nổi tiếng với các món hải sản tươi.",
            "Chúng tôi thường ăn tối cùng nhau vào cuối tuần.",
        ],
    },
    TopicSentences {
        topic: "work",
        level: "medium",
        sentences: &[
            "Tôi thường đến văn phòng trước tám giờ sáng.",
            "Cuộc họp hôm nay đã bị hoãn sang tuần sau.",
            "Sếp của tôi yêu cầu tôi hoàn thành báo cáo trước thứ Sáu.",
        ],
    },
    TopicSentences {
        topic: "work",
        level: "hard",
        sentences: &[
            "Làm việc từ xa đòi hỏi khả năng quản lý thời gian tốt.",
            "Nếu được thăng chức, tôi sẽ phải chịu trách nhiệm nhiều hơn.",
            "Công ty đang tìm cách cân bằng giữa lợi nhuận và phúc lợi nhân viên.",
        ],
    },
];

pub const QUIZ_BANK: &[TopicQuestions] = &[
    TopicQuestions {
        topic: "travel",
        level: "easy",
        questions: &[
            CuratedQuestion {
                question: "Choose the correct word: I want to ___ a hotel room.",
                options: ["book", "read", "write", "cook"],
                answer: 0,
                explain: "\"Book a room\" nghĩa là đặt phòng.",
            },
            CuratedQuestion {
                question: "What is the English word for \"sân bay\"?",
                options: ["station", "airport", "harbour", "bus stop"],
                answer: 1,
                explain: "\"Airport\" là sân bay.",
            },
            CuratedQuestion {
                question: "Choose the correct sentence.",
                options: [
                    "I likes travelling by train.",
                    "I like travel by train.",
                    "I like travelling by train.",
                    "I liking travelling by train.",
                ],
                answer: 2,
                explain: "Sau \"like\" dùng V-ing: like travelling.",
            },
            CuratedQuestion {
                question: "Where do you show your passport?",
                options: ["at the kitchen", "at immigration", "at the cinema", "at school"],
                answer: 1,
                explain: "Hộ chiếu được kiểm tra ở quầy xuất nhập cảnh (immigration).",
            },
            CuratedQuestion {
                question: "\"Vé khứ hồi\" in English is:",
                options: ["single ticket", "return ticket", "free ticket", "late ticket"],
                answer: 1,
                explain: "\"Return ticket\" (hoặc round-trip ticket) là vé khứ hồi.",
            },
            CuratedQuestion {
                question: "Complete: Could you ___ me the way to the museum?",
                options: ["say", "tell", "speak", "talk"],
                answer: 1,
                explain: "Cụm cố định: tell someone the way (chỉ đường cho ai).",
            },
        ],
    },
    TopicQuestions {
        topic: "travel",
        level: "medium",
        questions: &[
            CuratedQuestion {
                question: "Choose the correct form: I ___ lost when I travelled abroad last year.",
                options: ["get", "got", "have got", "getting"],
                answer: 1,
                explain: "\"Last year\" là mốc quá khứ nên dùng quá khứ đơn: got lost.",
            },
            CuratedQuestion {
                question: "Which word means \"địa phương\"?",
                options: ["foreign", "local", "global", "urban"],
                answer: 1,
                explain: "\"Local\" nghĩa là thuộc về địa phương.",
            },
            CuratedQuestion {
                question: "Complete: Have you ever ___ to Japan?",
                options: ["go", "went", "been", "going"],
                answer: 2,
                explain: "Hỏi trải nghiệm dùng hiện tại hoàn thành: have been to.",
            },
            CuratedQuestion {
                question: "\"Trải nghiệm văn hóa\" is best translated as:",
                options: [
                    "experience the culture",
                    "experiment the culture",
                    "expert the culture",
                    "expect the culture",
                ],
                answer: 0,
                explain: "\"Experience\" (động từ) nghĩa là trải nghiệm.",
            },
        ],
    },
    TopicQuestions {
        topic: "school",
        level: "easy",
        questions: &[
            CuratedQuestion {
                question: "Complete: I go to school ___ bike.",
                options: ["on", "by", "in", "with"],
                answer: 1,
                explain: "Phương tiện đi lại dùng \"by\": by bike, by bus.",
            },
            CuratedQuestion {
                question: "What is \"môn học yêu thích\" in English?",
                options: ["favourite subject", "favourite teacher", "hard lesson", "best class"],
                answer: 0,
                explain: "\"Subject\" là môn học, \"favourite\" là yêu thích.",
            },
            CuratedQuestion {
                question: "Choose the correct sentence.",
                options: [
                    "I has many friends at school.",
                    "I have many friends at school.",
                    "I having many friends at school.",
                    "I am have many friends at school.",
                ],
                answer: 1,
                explain: "Chủ ngữ \"I\" đi với \"have\".",
            },
            CuratedQuestion {
                question: "Where do students borrow books?",
                options: ["canteen", "library", "gym", "playground"],
                answer: 1,
                explain: "\"Library\" là thư viện.",
            },
            CuratedQuestion {
                question: "\"Bài tập về nhà\" in English is:",
                options: ["housework", "homework", "homeland", "workshop"],
                answer: 1,
                explain: "\"Homework\" là bài tập về nhà; \"housework\" là việc nhà.",
            },
        ],
    },
    TopicQuestions {
        topic: "school",
        level: "medium",
        questions: &[
            CuratedQuestion {
                question: "Complete: I usually ___ my homework in the evening.",
                options: ["make", "do", "take", "have"],
                answer: 1,
                explain: "Cụm cố định: do homework.",
            },
            CuratedQuestion {
                question: "Which word means \"nhiệt tình\"?",
                options: ["lazy", "enthusiastic", "strict", "boring"],
                answer: 1,
                explain: "\"Enthusiastic\" nghĩa là nhiệt tình.",
            },
            CuratedQuestion {
                question: "Complete: I want to ___ the English club.",
                options: ["join", "joining", "joined", "joins"],
                answer: 0,
                explain: "Sau \"want to\" dùng động từ nguyên mẫu: join.",
            },
            CuratedQuestion {
                question: "\"Học nhóm\" is best translated as:",
                options: ["group study", "team sport", "class trip", "study abroad"],
                answer: 0,
                explain: "\"Group study\" là học nhóm.",
            },
        ],
    },
];
