use serde::Serialize;

/// A code panel shown next to the comparison: the sample and its energy notes.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CodeSample {
    pub heading: &'static str,
    pub efficient: bool,
    pub title: &'static str,
    pub source: &'static str,
    pub notes: [&'static str; 4],
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct LearningPoints {
    pub heading: &'static str,
    pub items: [&'static str; 4],
}

pub static CODE_SAMPLES: [CodeSample; 2] = [
    CodeSample {
        heading: "Inefficient Code",
        efficient: false,
        title: "Bubble Sort - O(n²)",
        source: "fn bubble_sort(arr: &mut [i32]) {
    let n = arr.len();
    for i in 0..n {
        for j in 0..n.saturating_sub(i + 1) {
            if arr[j] > arr[j + 1] {
                arr.swap(j, j + 1);
            }
        }
    }
}",
        notes: [
            "Nested loops = O(n²) operations",
            "Many memory swaps",
            "Cache misses",
            "High CPU utilization",
        ],
    },
    CodeSample {
        heading: "Efficient Code",
        efficient: true,
        title: "Optimized Sort - O(n log n)",
        source: "fn optimized_sort(arr: &mut [i32]) {
    // standard library driftsort, tuned for real-world data
    arr.sort();
}",
        notes: [
            "Hybrid stable sort",
            "Optimized for partially sorted data",
            "Better cache utilization",
            "Lower CPU overhead",
        ],
    },
];

pub static LEARNING_POINTS: [LearningPoints; 2] = [
    LearningPoints {
        heading: "For Students",
        items: [
            "Algorithm choice directly impacts energy consumption",
            "O(n²) algorithms can use 100x more energy than O(n log n)",
            "Small optimizations scale to massive environmental impact",
            "Green computing is both ethical and economical",
        ],
    },
    LearningPoints {
        heading: "Real-World Application",
        items: [
            "Banking: Processing millions of transactions efficiently",
            "Mobile apps: Preserving battery life",
            "Cloud services: Reducing operational costs",
            "IoT devices: Extending device lifetime",
        ],
    },
];

pub static DEMO_STEPS: [&str; 5] = [
    "Select different algorithms and array sizes",
    "Click \"Run Test\" to see real-time energy consumption",
    "Compare results between efficient and inefficient algorithms",
    "Notice how energy consumption scales with complexity",
    "Discuss: How would this impact a system processing millions of requests?",
];
